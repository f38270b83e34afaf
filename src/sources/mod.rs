mod local;

pub use local::load_processed_dir;
