//! # Directory object snapshots with a Windows security descriptor decoder
//!
//! Renders the attributes of directory objects (Active Directory users,
//! groups, organizational units, computers…) as an ordered, JSON-shaped
//! tree. The crate provides:
//! - Primitive decoders for binary SIDs ([`decode_sid`]), FILETIME
//!   attributes ([`decode_filetime`]) and wire GUIDs ([`format_guid`]).
//! - [`SecurityDescriptor`]: a bounds-checked decoder for self-relative
//!   security descriptors, with the owner, group and DACL resolved and every
//!   ACE classified as simple, object or opaque.
//! - [`OutputNode`]: the insertion-ordered output tree and its indented text
//!   form.
//! - [`Catalog`], [`project_entry`] and [`DocumentBuilder`]: which attributes
//!   to collect per object category and how to decode each of them.
//!
//! ## Failure model
//! Typed entry points ([`SecurityDescriptor::parse`],
//! [`SidIdentity::from_bytes`]…) return [`DecodeError`]. Rendering entry
//! points never fail: malformed SIDs and FILETIMEs render as `"Invalid"`,
//! damaged ACEs carry a `decode_error` field, and one bad attribute never
//! spoils the rest of an entry.
//!
//! ## Examples
//! ### Decode a SID
//! ```rust
//! use adsnap::decode_sid;
//!
//! let bytes: [u8; 16] = [1, 2, 0, 0, 0, 0, 0, 5, 32, 0, 0, 0, 32, 2, 0, 0];
//! assert_eq!(decode_sid(Some(bytes.as_slice())), "S-1-5-32-544");
//! ```
//!
//! ### Render a security descriptor
//! ```rust
//! use adsnap::decode_security_descriptor;
//!
//! let mut blob = vec![1, 0, 0x04, 0x80, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 20, 0, 0, 0];
//! // empty DACL: revision 2, size 8, no ACE
//! blob.extend_from_slice(&[2, 0, 8, 0, 0, 0, 0, 0]);
//! let node = decode_security_descriptor(Some(blob.as_slice()));
//! assert_eq!(
//!     node.to_string(),
//!     r#"{
//!     "revision": 1,
//!     "control": 32772,
//!     "dacl": {
//!         "revision": 2,
//!         "size": 8,
//!         "ace_count": 0,
//!         "aces": []
//!     }
//! }"#
//! );
//! ```
//!
//! ## Features
//! - `std` (default): implements `std::error::Error` through the
//!   dependencies. Without it the crate is `no_std` + `alloc`.
//! - `serde` (default): `Serialize` for the output tree, serde support for
//!   [`SidIdentity`] and the catalog types.
//! - `macro`: re-exports `sid!`, which turns a SID literal into its wire
//!   bytes at compile time.
//! - `ldap3`: implements [`DirectoryEntry`] for `ldap3::SearchEntry`.

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg, doc_cfg))]

extern crate alloc;

/// Marker rendered in place of a value that could not be decoded.
pub const INVALID: &str = "Invalid";

mod error;
pub use error::{DecodeError, ProjectionError};

mod reader;
pub use reader::ByteReader;

mod sid_identifier_authority;
pub use sid_identifier_authority::SidIdentifierAuthority;

mod sid;
pub use sid::{InvalidSidFormat, MAX_SUBAUTHORITY_COUNT, SID_HEADER_SIZE, SidIdentity, decode_sid};

mod filetime;
pub use filetime::{Filetime, NEVER, decode_filetime};

mod guid;
pub use guid::{GUID_SIZE, format_guid, read_guid};

mod output;
pub use output::{ObjectNode, OutputNode};

pub mod security_descriptor;
pub use security_descriptor::{
    Ace, AceBody, AceType, Acl, SecurityDescriptor, SecurityDescriptorHeader,
    decode_security_descriptor,
};

mod catalog;
pub use catalog::{AttributeSpec, Catalog, Category, SemanticType};

mod projection;
pub use projection::{DirectoryEntry, DocumentBuilder, project_entry, project_value};

#[cfg(feature = "ldap3")]
mod ldap;

#[cfg(feature = "serde")]
mod serde_impl;

/// Turns a SID literal into its wire bytes at compile time.
///
/// ```rust
/// # #[cfg(feature = "macro")]
/// # {
/// const SYSTEM: [u8; 12] = adsnap::sid!("S-1-5-18");
/// assert_eq!(adsnap::decode_sid(Some(SYSTEM.as_slice())), "S-1-5-18");
/// # }
/// ```
#[cfg(feature = "macro")]
pub use sid_macro::sid;
