//! Pure helpers for turning a scanned device code into an IFU identity.
//!
//! Nothing in this crate performs I/O. The [`parse_scan_payload`] function
//! never fails: unrecognized input degrades to a best-effort partial
//! [`ResolvedIdentity`]. The display helpers ([`format_doc_label`],
//! [`unescape_newlines`]) only touch text that is about to be shown.

mod doc_label;
mod identity;
mod payload;
mod snippet;

pub use doc_label::format_doc_label;
pub use identity::ResolvedIdentity;
pub use payload::parse_scan_payload;
pub use snippet::unescape_newlines;
