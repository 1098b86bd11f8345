use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaptchaError {
    #[error("failed to read captcha image {path}: {source}")]
    Acquisition {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("failed to read iconset directory {path}: {source}")]
    IconsetDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("no reference icons could be loaded from {path}")]
    EmptyIconset { path: PathBuf },

    #[error("no guess met the similarity threshold for character {position}")]
    NoGuess { position: usize },
}
