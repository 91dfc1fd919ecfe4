use image::GrayImage;

use crate::shared::constants::SAMPLE_EXTENSION;

/// A normalised face crop together with the student id it belongs to.
#[derive(Clone, Debug)]
pub struct LabeledFace {
    pub label: String,
    pub image: GrayImage,
}

/// Fields encoded in a sample filename, `{id}_{name}_{index}.jpg`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SampleName {
    pub student_id: String,
    pub name: String,
    pub index: usize,
}

impl SampleName {
    pub fn new(student_id: &str, name: &str, index: usize) -> Self {
        Self {
            student_id: student_id.to_string(),
            name: name.to_string(),
            index,
        }
    }

    pub fn file_name(&self) -> String {
        format!(
            "{}_{}_{}.{SAMPLE_EXTENSION}",
            self.student_id, self.name, self.index
        )
    }

    /// Parses a file name (extension ignored).
    ///
    /// The id ends at the first `_` and the index follows the last one,
    /// so names may themselves contain underscores.
    pub fn parse(file_name: &str) -> Option<Self> {
        let stem = file_name
            .rsplit_once('.')
            .map_or(file_name, |(stem, _)| stem);
        let (student_id, rest) = stem.split_once('_')?;
        let (name, index) = rest.rsplit_once('_')?;
        if student_id.is_empty() {
            return None;
        }
        Some(Self {
            student_id: student_id.to_string(),
            name: name.to_string(),
            index: index.parse().ok()?,
        })
    }
}

/// Training label of a sample file: everything before the first `_`.
pub fn label_of(file_name: &str) -> Option<&str> {
    let (label, _) = file_name.split_once('_')?;
    (!label.is_empty()).then_some(label)
}
