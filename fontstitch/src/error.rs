use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io failed for {path:?}: '{source}'")]
    FileIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Missing file {0:?}")]
    FileExpected(PathBuf),
    #[error(transparent)]
    YamlSerError(#[from] serde_yaml::Error),
    #[error(transparent)]
    FontError(#[from] fontedit::Error),
}
