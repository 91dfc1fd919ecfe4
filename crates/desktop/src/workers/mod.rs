pub mod model_cache;
pub mod session_worker;
