use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Core(#[from] dossier_core::Error),
  #[error(
    "auxiliary dataset is not a profile array or an object with a \
     `profiles` array"
  )]
  MalformedAuxDataset,
  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
