//! Error taxonomy for the client core.

/// Errors surfaced by the API transport.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server answered with a non-success status. `message` is the
    /// human-readable text extracted from the error body (or the status line
    /// when the body carried none) — this is what toasts and inline alerts
    /// show.
    #[error("{message}")]
    Remote { status: u16, message: String },

    /// The call never produced a usable response: DNS, connect, timeout, or
    /// an unparseable body.
    #[error("request failed: {0}")]
    Transport(String),

    /// An authenticated call was issued with no credential in the slot.
    #[error("not authenticated")]
    MissingCredential,
}

/// Errors returned by the controllers.
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// An action referenced a record the collection does not hold.
    #[error("no request with id {0} in the collection")]
    UnknownRecord(String),

    /// The reset link carried no `token` query parameter. Terminal for the
    /// reset flow — the user must request a fresh link.
    #[error("reset link is missing its token")]
    MissingResetToken,

    /// The server answered 2xx but the body was not the shape the flow
    /// needs (e.g. a login response without a token).
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}
