pub mod image_sample_store;
