#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The supplied issue identifier is not a well-formed id.
    #[error("Argument passed in must be a valid issue id, got '{0}'")]
    InvalidId(String),

    /// A request failed field validation. The message is returned verbatim.
    #[error("{0}")]
    Validation(String),
}
