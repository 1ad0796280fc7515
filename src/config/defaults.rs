use std::path::PathBuf;

pub fn default_retries() -> u32 {
    3
}

pub fn default_node_binary() -> PathBuf {
    PathBuf::from("node")
}

pub fn default_project_dir() -> PathBuf {
    PathBuf::from(".")
}

pub fn default_settings_path() -> PathBuf {
    PathBuf::from("cypress-retries.yaml")
}
