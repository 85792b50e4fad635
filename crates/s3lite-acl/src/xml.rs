//! XML codec for the `AccessControlPolicy` document.
//!
//! The encoded form is the one S3 clients send and receive on the `?acl`
//! sub-resource:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <AccessControlPolicy xmlns="http://s3.amazonaws.com/doc/2006-03-01/">
//!   <Owner><ID>owner-id</ID><DisplayName>owner</DisplayName></Owner>
//!   <AccessControlList>
//!     <Grant>
//!       <Grantee xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:type="Group">
//!         <URI>http://acs.amazonaws.com/groups/global/AllUsers</URI>
//!       </Grantee>
//!       <Permission>READ</Permission>
//!     </Grant>
//!   </AccessControlList>
//! </AccessControlPolicy>
//! ```
//!
//! Decoding matches elements by local name, so namespace prefixes on the
//! input are accepted.

use std::io::{self, Write};

use quick_xml::events::{BytesDecl, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use s3lite_core::CanonicalUser;
use tracing::debug;

use crate::acp::AccessControlPolicy;
use crate::error::AclError;
use crate::grantee::{Grantee, GranteeKind, Group};
use crate::permission::Permission;

/// The S3 XML namespace.
pub const S3_NAMESPACE: &str = "http://s3.amazonaws.com/doc/2006-03-01/";

const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Encode a policy as an `AccessControlPolicy` XML document.
///
/// Fails with [`AclError::MissingOwner`] when the policy has no owner.
///
/// # Examples
///
/// ```
/// use s3lite_acl::{AccessControlPolicy, xml};
/// use s3lite_core::CanonicalUser;
///
/// let acp = AccessControlPolicy::for_owner(CanonicalUser::new("owner-id"));
/// let doc = xml::encode(&acp).unwrap();
/// assert_eq!(xml::decode(doc.as_bytes()).unwrap(), acp);
/// ```
pub fn encode(acp: &AccessControlPolicy) -> Result<String, AclError> {
    let owner = acp.owner().ok_or(AclError::MissingOwner)?;

    let mut buf = Vec::with_capacity(512);
    let mut writer = Writer::new(&mut buf);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer
        .create_element("AccessControlPolicy")
        .with_attribute(("xmlns", S3_NAMESPACE))
        .write_inner_content(|w| {
            write_user(w, "Owner", owner)?;
            w.create_element("AccessControlList")
                .write_inner_content(|w| {
                    for grant in acp.grants() {
                        w.create_element("Grant").write_inner_content(|w| {
                            write_grantee(w, grant.grantee())?;
                            write_text_element(w, "Permission", &grant.permission().to_string())
                        })?;
                    }
                    Ok(())
                })?;
            Ok(())
        })?;

    String::from_utf8(buf).map_err(|e| AclError::Encode(io::Error::new(io::ErrorKind::InvalidData, e)))
}

/// Decode an `AccessControlPolicy` XML document.
///
/// The document must contain an `Owner` with an `ID` and an
/// `AccessControlList`; every `Grant` needs a `Grantee` with an `xsi:type`
/// and a `Permission`. Group grantees must name a known group URI. Decoded
/// grants count against the grant limit.
pub fn decode(xml: &[u8]) -> Result<AccessControlPolicy, AclError> {
    let mut reader = Reader::from_reader(xml);

    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Start(e) => {
                expect_root(&e)?;
                let acp = read_policy(&mut reader)?;
                debug!(grants = acp.len(), "decoded access control policy");
                return Ok(acp);
            }
            Event::Empty(e) => {
                expect_root(&e)?;
                return Err(missing("Owner"));
            }
            Event::Eof => return Err(missing("AccessControlPolicy")),
            _ => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Encoding helpers
// ---------------------------------------------------------------------------

fn write_text_element<W: Write>(writer: &mut Writer<W>, tag: &str, text: &str) -> io::Result<()> {
    writer
        .create_element(tag)
        .write_text_content(BytesText::new(text))?;
    Ok(())
}

fn write_user<W: Write>(writer: &mut Writer<W>, tag: &str, user: &CanonicalUser) -> io::Result<()> {
    writer.create_element(tag).write_inner_content(|w| {
        write_text_element(w, "ID", user.id())?;
        write_text_element(w, "DisplayName", user.display_name())
    })?;
    Ok(())
}

fn write_grantee<W: Write>(writer: &mut Writer<W>, grantee: &Grantee) -> io::Result<()> {
    writer
        .create_element("Grantee")
        .with_attribute(("xmlns:xsi", XSI_NAMESPACE))
        .with_attribute(("xsi:type", grantee.kind().as_str()))
        .write_inner_content(|w| match grantee {
            Grantee::CanonicalUser(user) => {
                write_text_element(w, "ID", user.id())?;
                write_text_element(w, "DisplayName", user.display_name())
            }
            Grantee::Group(group) => write_text_element(w, "URI", group.uri()),
        })?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Decoding helpers
// ---------------------------------------------------------------------------

fn malformed(err: impl std::fmt::Display) -> AclError {
    AclError::MalformedDocument(err.to_string())
}

fn missing(element: &str) -> AclError {
    AclError::MalformedDocument(format!("missing required element {element}"))
}

fn unexpected_eof(context: &str) -> AclError {
    AclError::MalformedDocument(format!("unexpected end of document in {context}"))
}

fn local_name(e: &BytesStart<'_>) -> Result<String, AclError> {
    std::str::from_utf8(e.local_name().as_ref())
        .map(str::to_owned)
        .map_err(malformed)
}

fn expect_root(e: &BytesStart<'_>) -> Result<(), AclError> {
    let name = local_name(e)?;
    if name == "AccessControlPolicy" {
        Ok(())
    } else {
        Err(AclError::MalformedDocument(format!(
            "unexpected root element {name}"
        )))
    }
}

/// Read text up to the end tag of the current element, trimmed at both ends.
fn read_text_content(reader: &mut Reader<&[u8]>) -> Result<String, AclError> {
    let mut text = String::new();
    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Text(e) => text.push_str(&e.decode().map_err(malformed)?),
            Event::CData(e) => text.push_str(&e.decode().map_err(malformed)?),
            Event::GeneralRef(e) => {
                if let Some(ch) = e.resolve_char_ref().map_err(malformed)? {
                    text.push(ch);
                } else {
                    let name = e.decode().map_err(malformed)?;
                    let resolved = quick_xml::escape::resolve_predefined_entity(&name).ok_or_else(
                        || AclError::MalformedDocument(format!("unknown entity &{name};")),
                    )?;
                    text.push_str(resolved);
                }
            }
            Event::End(_) => return Ok(text.trim().to_owned()),
            Event::Start(e) => {
                return Err(AclError::MalformedDocument(format!(
                    "unexpected element {} in text content",
                    local_name(&e)?
                )));
            }
            Event::Eof => return Err(unexpected_eof("text content")),
            _ => {}
        }
    }
}

/// Skip over an element and all its children.
fn skip_element(reader: &mut Reader<&[u8]>) -> Result<(), AclError> {
    let mut depth: u32 = 1;
    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
            Event::Eof => return Err(unexpected_eof("skipped element")),
            _ => {}
        }
    }
}

fn read_policy(reader: &mut Reader<&[u8]>) -> Result<AccessControlPolicy, AclError> {
    let mut owner = None;
    let mut grants = None;

    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Start(e) => match local_name(&e)?.as_str() {
                "Owner" => owner = Some(read_owner(reader)?),
                "AccessControlList" => grants = Some(read_grant_list(reader)?),
                _ => skip_element(reader)?,
            },
            Event::Empty(e) => match local_name(&e)?.as_str() {
                "Owner" => return Err(missing("ID")),
                "AccessControlList" => grants = Some(Vec::new()),
                _ => {}
            },
            Event::End(_) => break,
            Event::Eof => return Err(unexpected_eof("AccessControlPolicy")),
            _ => {}
        }
    }

    let owner = owner.ok_or_else(|| missing("Owner"))?;
    let grants = grants.ok_or_else(|| missing("AccessControlList"))?;

    let mut acp = AccessControlPolicy::new();
    acp.set_owner(owner);
    for (grantee, permission) in grants {
        acp.grant_permission(grantee, permission)?;
    }
    Ok(acp)
}

/// Read the `ID` and optional `DisplayName` children of a user element.
fn read_user_fields(
    reader: &mut Reader<&[u8]>,
    context: &str,
) -> Result<(Option<String>, Option<String>), AclError> {
    let mut id = None;
    let mut display_name = None;

    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Start(e) => match local_name(&e)?.as_str() {
                "ID" => id = Some(read_text_content(reader)?),
                "DisplayName" => display_name = Some(read_text_content(reader)?),
                _ => skip_element(reader)?,
            },
            Event::Empty(e) => match local_name(&e)?.as_str() {
                "ID" => id = Some(String::new()),
                "DisplayName" => display_name = Some(String::new()),
                _ => {}
            },
            Event::End(_) => return Ok((id, display_name)),
            Event::Eof => return Err(unexpected_eof(context)),
            _ => {}
        }
    }
}

fn build_user(id: Option<String>, display_name: Option<String>) -> Result<CanonicalUser, AclError> {
    let id = id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| missing("ID"))?;
    Ok(match display_name.filter(|name| !name.is_empty()) {
        Some(name) => CanonicalUser::with_display_name(id, name),
        None => CanonicalUser::new(id),
    })
}

fn read_owner(reader: &mut Reader<&[u8]>) -> Result<CanonicalUser, AclError> {
    let (id, display_name) = read_user_fields(reader, "Owner")?;
    build_user(id, display_name)
}

fn read_grant_list(reader: &mut Reader<&[u8]>) -> Result<Vec<(Grantee, Permission)>, AclError> {
    let mut grants = Vec::new();
    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Start(e) => match local_name(&e)?.as_str() {
                "Grant" => grants.push(read_grant(reader)?),
                _ => skip_element(reader)?,
            },
            Event::Empty(e) => {
                if local_name(&e)? == "Grant" {
                    return Err(missing("Grantee"));
                }
            }
            Event::End(_) => return Ok(grants),
            Event::Eof => return Err(unexpected_eof("AccessControlList")),
            _ => {}
        }
    }
}

fn read_grant(reader: &mut Reader<&[u8]>) -> Result<(Grantee, Permission), AclError> {
    let mut grantee = None;
    let mut permission = None;

    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Start(e) => match local_name(&e)?.as_str() {
                "Grantee" => {
                    let kind = grantee_kind(&e)?;
                    grantee = Some(read_grantee(reader, kind)?);
                }
                "Permission" => {
                    let text = read_text_content(reader)?;
                    let parsed: Permission = text.parse().map_err(|_| {
                        AclError::MalformedDocument(format!("invalid permission {text:?}"))
                    })?;
                    permission = Some(parsed);
                }
                _ => skip_element(reader)?,
            },
            Event::Empty(e) => match local_name(&e)?.as_str() {
                "Grantee" => {
                    grantee_kind(&e)?;
                    return Err(missing("Grantee content"));
                }
                "Permission" => return Err(AclError::MalformedDocument("empty Permission".to_owned())),
                _ => {}
            },
            Event::End(_) => break,
            Event::Eof => return Err(unexpected_eof("Grant")),
            _ => {}
        }
    }

    let grantee = grantee.ok_or_else(|| missing("Grantee"))?;
    let permission = permission.ok_or_else(|| missing("Permission"))?;
    Ok((grantee, permission))
}

/// Read the `xsi:type` attribute of a `Grantee` start tag.
fn grantee_kind(e: &BytesStart<'_>) -> Result<GranteeKind, AclError> {
    for attr in e.attributes() {
        let attr = attr.map_err(malformed)?;
        if attr.key.local_name().as_ref() == b"type" {
            let value = std::str::from_utf8(&attr.value).map_err(malformed)?;
            return GranteeKind::parse(value).ok_or_else(|| {
                AclError::MalformedDocument(format!("unsupported grantee type {value:?}"))
            });
        }
    }
    Err(AclError::MalformedDocument(
        "Grantee is missing its type attribute".to_owned(),
    ))
}

fn read_grantee(reader: &mut Reader<&[u8]>, kind: GranteeKind) -> Result<Grantee, AclError> {
    match kind {
        GranteeKind::CanonicalUser => {
            let (id, display_name) = read_user_fields(reader, "Grantee")?;
            Ok(Grantee::CanonicalUser(build_user(id, display_name)?))
        }
        GranteeKind::Group => {
            let mut uri = None;
            loop {
                match reader.read_event().map_err(malformed)? {
                    Event::Start(e) => match local_name(&e)?.as_str() {
                        "URI" => uri = Some(read_text_content(reader)?),
                        _ => skip_element(reader)?,
                    },
                    Event::End(_) => break,
                    Event::Eof => return Err(unexpected_eof("Grantee")),
                    _ => {}
                }
            }
            let uri = uri.ok_or_else(|| missing("URI"))?;
            Group::from_uri(uri.trim())
                .map(Grantee::Group)
                .ok_or_else(|| AclError::MalformedDocument(format!("unknown group URI {uri:?}")))
        }
    }
}
