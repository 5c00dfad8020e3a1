//! Access-control entries.
//!
//! Every record starts with the same 4-byte header; the body shape depends on
//! the type byte:
//!
//! ```text
//! simple  : header | access_mask | trustee SID
//! object  : header | access_mask | object_flags | [object type GUID]
//!                  | [inherited object type GUID] | trustee SID
//! opaque  : header | bytes carried verbatim
//! ```

use alloc::string::ToString;
use alloc::vec::Vec;

use num_enum::{IntoPrimitive, TryFromPrimitive};
use tracing::trace;
use uuid::Uuid;

use crate::guid::{GUID_SIZE, guid_text, read_guid};
use crate::{ByteReader, DecodeError, ObjectNode, OutputNode, SidIdentity};

/// Size of the common ACE header.
pub const ACE_HEADER_SIZE: usize = 4;
/// `object_flags` bit announcing an object type GUID.
pub const ACE_OBJECT_TYPE_PRESENT: u32 = 0x1;
/// `object_flags` bit announcing an inherited object type GUID.
pub const ACE_INHERITED_OBJECT_TYPE_PRESENT: u32 = 0x2;

/// ACE type tags defined by MS-DTYP 2.4.4.1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum AceType {
    AccessAllowed = 0x00,
    AccessDenied = 0x01,
    SystemAudit = 0x02,
    SystemAlarm = 0x03,
    AccessAllowedCompound = 0x04,
    AccessAllowedObject = 0x05,
    AccessDeniedObject = 0x06,
    SystemAuditObject = 0x07,
    SystemAlarmObject = 0x08,
    AccessAllowedCallback = 0x09,
    AccessDeniedCallback = 0x0A,
    AccessAllowedCallbackObject = 0x0B,
    AccessDeniedCallbackObject = 0x0C,
    SystemAuditCallback = 0x0D,
    SystemAlarmCallback = 0x0E,
    SystemAuditCallbackObject = 0x0F,
    SystemAlarmCallbackObject = 0x10,
    SystemMandatoryLabel = 0x11,
    SystemResourceAttribute = 0x12,
    SystemScopedPolicyId = 0x13,
}

/// Body layout of an ACE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AceFamily {
    /// Access mask then trustee SID.
    Simple,
    /// Access mask, object flags, optional GUIDs, trustee SID.
    Object,
    /// Anything else: carried as raw bytes.
    Opaque,
}

impl AceType {
    #[inline]
    #[must_use]
    pub const fn family(self) -> AceFamily {
        match self {
            Self::AccessAllowed
            | Self::AccessDenied
            | Self::AccessAllowedCallback
            | Self::AccessDeniedCallback => AceFamily::Simple,
            Self::AccessAllowedObject
            | Self::AccessDeniedObject
            | Self::AccessAllowedCallbackObject
            | Self::AccessDeniedCallbackObject => AceFamily::Object,
            Self::SystemAudit
            | Self::SystemAlarm
            | Self::AccessAllowedCompound
            | Self::SystemAuditObject
            | Self::SystemAlarmObject
            | Self::SystemAuditCallback
            | Self::SystemAlarmCallback
            | Self::SystemAuditCallbackObject
            | Self::SystemAlarmCallbackObject
            | Self::SystemMandatoryLabel
            | Self::SystemResourceAttribute
            | Self::SystemScopedPolicyId => AceFamily::Opaque,
        }
    }
}

impl AceFamily {
    /// Family of a raw type byte; unknown tags are opaque.
    #[inline]
    #[must_use]
    pub fn of(ace_type: u8) -> Self {
        AceType::try_from(ace_type).map_or(Self::Opaque, AceType::family)
    }
}

/// The common 4-byte ACE header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AceHeader {
    /// Raw type byte, kept as-is so unknown tags survive.
    pub ace_type: u8,
    pub flags: u8,
    /// Total record size, header included.
    pub size: u16,
}

impl AceHeader {
    /// # Errors
    /// [`DecodeError::OutOfBounds`] if fewer than 4 bytes are readable.
    #[inline]
    pub fn read(reader: &ByteReader<'_>) -> Result<Self, DecodeError> {
        let [ace_type, flags, s0, s1] = reader.read_array(0)?;
        Ok(Self {
            ace_type,
            flags,
            size: u16::from_le_bytes([s0, s1]),
        })
    }

    /// The known type, `None` for tags outside 0x00–0x13.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> Option<AceType> {
        AceType::try_from(self.ace_type).ok()
    }
}

/// Fields of a simple ACE, filled in order until a read fails.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SimpleAce {
    pub access_mask: Option<u32>,
    pub trustee: Option<SidIdentity>,
}

impl SimpleAce {
    fn fill(&mut self, body: &ByteReader<'_>) -> Result<(), DecodeError> {
        self.access_mask = Some(body.read_u32_le(0)?);
        self.trustee = Some(SidIdentity::read(&body.tail(4)?)?);
        Ok(())
    }
}

/// Fields of an object ACE, filled in order until a read fails.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ObjectAce {
    pub access_mask: Option<u32>,
    pub object_flags: Option<u32>,
    pub object_type: Option<Uuid>,
    pub inherited_object_type: Option<Uuid>,
    pub trustee: Option<SidIdentity>,
}

impl ObjectAce {
    fn fill(&mut self, body: &ByteReader<'_>) -> Result<(), DecodeError> {
        self.access_mask = Some(body.read_u32_le(0)?);
        let object_flags = body.read_u32_le(4)?;
        self.object_flags = Some(object_flags);

        let mut cursor = 8;
        if object_flags & ACE_OBJECT_TYPE_PRESENT != 0 {
            self.object_type = Some(read_guid(body, cursor)?);
            cursor += GUID_SIZE;
        }
        if object_flags & ACE_INHERITED_OBJECT_TYPE_PRESENT != 0 {
            self.inherited_object_type = Some(read_guid(body, cursor)?);
            cursor += GUID_SIZE;
        }
        self.trustee = Some(SidIdentity::read(&body.tail(cursor)?)?);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AceBody {
    Simple(SimpleAce),
    Object(ObjectAce),
    /// Body bytes after the header, verbatim.
    Opaque(Vec<u8>),
}

/// One decoded ACE record.
///
/// A record whose body runs out before all of its fields could be read keeps
/// the fields that were read and records the failing read in `error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ace {
    pub header: AceHeader,
    pub body: AceBody,
    pub error: Option<DecodeError>,
}

impl Ace {
    /// Decodes the record starting at `offset` inside `extent`.
    ///
    /// Body reads are confined to the record's declared size, clamped to the
    /// extent.
    ///
    /// A record declaring fewer bytes than its header gets an empty body and
    /// [`DecodeError::AceTooSmall`] whatever its family.
    ///
    /// # Errors
    /// [`DecodeError::OutOfBounds`] only if the 4-byte header does not fit;
    /// body failures are kept in [`Ace::error`].
    #[inline]
    pub fn read(extent: &ByteReader<'_>, offset: usize) -> Result<Self, DecodeError> {
        let header = AceHeader::read(&extent.tail(offset)?)?;
        let record = extent.window_clamped(offset, usize::from(header.size))?;
        let body = record.tail(ACE_HEADER_SIZE.min(record.len()))?;

        let family = AceFamily::of(header.ace_type);
        trace!(offset = record.base(), ?family, size = header.size, "ACE");

        if usize::from(header.size) < ACE_HEADER_SIZE {
            let body = match family {
                AceFamily::Simple => AceBody::Simple(SimpleAce::default()),
                AceFamily::Object => AceBody::Object(ObjectAce::default()),
                AceFamily::Opaque => AceBody::Opaque(Vec::new()),
            };
            return Ok(Self {
                header,
                error: Some(DecodeError::AceTooSmall(header.size)),
                body,
            });
        }

        let (body, error) = match family {
            AceFamily::Simple => {
                let mut ace = SimpleAce::default();
                let error = ace.fill(&body).err();
                (AceBody::Simple(ace), error)
            }
            AceFamily::Object => {
                let mut ace = ObjectAce::default();
                let error = ace.fill(&body).err();
                (AceBody::Object(ace), error)
            }
            AceFamily::Opaque => (AceBody::Opaque(body.as_bytes().to_vec()), None),
        };
        Ok(Self {
            header,
            body,
            error,
        })
    }

    /// Renders the record: `type`, `flags`, `size`, the family fields, and
    /// `decode_error` when a body read failed.
    #[inline]
    #[must_use]
    pub fn to_node(&self) -> OutputNode {
        let mut node = ObjectNode::new()
            .with("type", self.header.ace_type)
            .with("flags", self.header.flags)
            .with("size", self.header.size);

        match &self.body {
            AceBody::Simple(ace) => {
                if let Some(access_mask) = ace.access_mask {
                    node.insert("access_mask", access_mask);
                }
                if let Some(trustee) = &ace.trustee {
                    node.insert("trustee", trustee.to_string());
                }
            }
            AceBody::Object(ace) => {
                if let Some(access_mask) = ace.access_mask {
                    node.insert("access_mask", access_mask);
                }
                if let Some(object_flags) = ace.object_flags {
                    node.insert("object_flags", object_flags);
                }
                if let Some(guid) = ace.object_type {
                    node.insert("object_type_guid", guid_text(&guid));
                }
                if let Some(guid) = ace.inherited_object_type {
                    node.insert("inherited_object_type_guid", guid_text(&guid));
                }
                if let Some(trustee) = &ace.trustee {
                    node.insert("trustee", trustee.to_string());
                }
            }
            AceBody::Opaque(bytes) => {
                node.insert("raw_data", hex::encode(bytes));
            }
        }

        if let Some(error) = &self.error {
            node.insert("decode_error", error.to_string());
        }
        node.into()
    }
}
