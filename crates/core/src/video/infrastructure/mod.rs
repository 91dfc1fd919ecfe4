pub mod ffmpeg_camera;
pub mod image_folder_source;
