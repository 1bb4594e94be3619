/// Contains the supported helm binaries.
pub(crate) mod binary;

/// Contains the client which runs helm commands.
pub(crate) mod client;

/// Contains the options for `helm upgrade`.
pub(crate) mod upgrade;
