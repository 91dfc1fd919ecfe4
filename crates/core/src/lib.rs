pub mod shared {
    pub mod constants;
    pub mod csv_table;
    pub mod data_layout;
    pub mod frame;
    pub mod region;
}

pub mod roster {
    pub mod domain {
        pub mod roster_error;
        pub mod student;
        pub mod student_repository;
        pub mod subject;
        pub mod subject_repository;
    }
    pub mod infrastructure;
}

pub mod attendance {
    pub mod domain {
        pub mod attendance_log;
        pub mod attendance_record;
        pub mod attendance_session;
        pub mod clock;
    }
    pub mod infrastructure;
}

pub mod samples {
    pub mod domain {
        pub mod face_sample;
        pub mod sample_store;
    }
    pub mod infrastructure;
}

pub mod detection {
    pub mod domain {
        pub mod face_detector;
    }
    pub mod infrastructure;
}

pub mod recognition {
    pub mod domain {
        pub mod face_recognizer;
    }
    pub mod infrastructure;
}

pub mod video {
    pub mod domain {
        pub mod camera_source;
    }
    pub mod infrastructure;
}

pub mod access {
    pub mod domain {
        pub mod access_gate;
        pub mod credential_verifier;
    }
    pub mod infrastructure;
}

pub mod pipeline {
    pub mod annotate;
    pub mod capture_samples_use_case;
    pub mod face_crop;
    pub mod register_student_use_case;
    pub mod retrain_student_use_case;
    pub mod session_observer;
    pub mod take_attendance_use_case;
    #[cfg(test)]
    pub(crate) mod test_support;
    pub mod train_model_use_case;
}
