// Library root
// -----------
// Client library for the Mapillary image service.
//
// Module responsibilities:
// - `v2`: blocking client for version 2 of the Mapillary HTTP API
//   (authenticated JSON requests).
// - `image`: resolves and downloads stored images by key.
//
// The crate installs no `tracing` subscriber and reads no configuration:
// callers supply the client identifier themselves, for example from their
// own configuration file.
pub mod image;
pub mod v2;
