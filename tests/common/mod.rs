#![allow(dead_code, reason = "each test binary uses a subset of the fixtures")]
#![allow(clippy::unwrap_used, reason = "Unwrap is not an issue in test")]

//! Builders for synthetic self-relative security descriptors.

/// Wire bytes of `bf967aba-0de6-11d0-a285-00aa003049e2` (the `user` class).
pub const USER_CLASS_GUID: [u8; 16] = [
    0xba, 0x7a, 0x96, 0xbf, 0xe6, 0x0d, 0xd0, 0x11, 0xa2, 0x85, 0x00, 0xaa, 0x00, 0x30, 0x49, 0xe2,
];

fn ace_header(ace_type: u8, flags: u8, body_len: usize) -> Vec<u8> {
    let size = u16::try_from(4 + body_len).unwrap();
    let mut out = vec![ace_type, flags];
    out.extend_from_slice(&size.to_le_bytes());
    out
}

pub fn simple_ace(ace_type: u8, flags: u8, mask: u32, trustee: &[u8]) -> Vec<u8> {
    let mut out = ace_header(ace_type, flags, 4 + trustee.len());
    out.extend_from_slice(&mask.to_le_bytes());
    out.extend_from_slice(trustee);
    out
}

pub fn object_ace(
    ace_type: u8,
    flags: u8,
    mask: u32,
    object_type: Option<[u8; 16]>,
    inherited_object_type: Option<[u8; 16]>,
    trustee: &[u8],
) -> Vec<u8> {
    let mut object_flags = 0_u32;
    let mut body = mask.to_le_bytes().to_vec();
    body.extend_from_slice(&[0; 4]);
    if let Some(guid) = object_type {
        object_flags |= 1;
        body.extend_from_slice(&guid);
    }
    if let Some(guid) = inherited_object_type {
        object_flags |= 2;
        body.extend_from_slice(&guid);
    }
    body[4..8].copy_from_slice(&object_flags.to_le_bytes());
    body.extend_from_slice(trustee);

    let mut out = ace_header(ace_type, flags, body.len());
    out.extend_from_slice(&body);
    out
}

pub fn opaque_ace(ace_type: u8, flags: u8, body: &[u8]) -> Vec<u8> {
    let mut out = ace_header(ace_type, flags, body.len());
    out.extend_from_slice(body);
    out
}

/// An ACL whose declared size covers exactly `aces`.
pub fn acl(revision: u8, ace_count: u16, aces: &[Vec<u8>]) -> Vec<u8> {
    let body = aces.concat();
    let size = u16::try_from(8 + body.len()).unwrap();
    let mut out = vec![revision, 0];
    out.extend_from_slice(&size.to_le_bytes());
    out.extend_from_slice(&ace_count.to_le_bytes());
    out.extend_from_slice(&[0, 0]);
    out.extend_from_slice(&body);
    out
}

/// Header, then owner, group and DACL laid out back to back.
pub fn descriptor(
    control: u16,
    owner: Option<&[u8]>,
    group: Option<&[u8]>,
    dacl: Option<&[u8]>,
) -> Vec<u8> {
    let mut out = vec![1, 0];
    out.extend_from_slice(&control.to_le_bytes());
    out.resize(20, 0);
    for (slot, part) in [(4, owner), (8, group), (16, dacl)] {
        if let Some(part) = part {
            let offset = u32::try_from(out.len()).unwrap();
            out[slot..slot + 4].copy_from_slice(&offset.to_le_bytes());
            out.extend_from_slice(part);
        }
    }
    out
}

/// Owner BUILTIN\Administrators, group SYSTEM, and a DACL holding one
/// allow ACE for Domain Admins and one object deny ACE for Everyone
/// inherited by `user` objects. 132 bytes.
pub fn sample_descriptor() -> Vec<u8> {
    let dacl = acl(
        4,
        2,
        &[
            simple_ace(
                0x00,
                0x02,
                0x000F_01FF,
                &sid_macro::sid!("S-1-5-21-1004336348-1177238915-682003330-512"),
            ),
            object_ace(
                0x06,
                0x02,
                0x100,
                None,
                Some(USER_CLASS_GUID),
                &sid_macro::sid!("S-1-1-0"),
            ),
        ],
    );
    descriptor(
        0x8004,
        Some(sid_macro::sid!("S-1-5-32-544").as_slice()),
        Some(sid_macro::sid!("S-1-5-18").as_slice()),
        Some(dacl.as_slice()),
    )
}
