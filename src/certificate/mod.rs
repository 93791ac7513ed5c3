//! Certificate module - Looks inside X.509 certificates embedded in strings.
//!
//! When both sides of a string change decode as certificates, the diff
//! engine compares their fields instead of the encoded text. Anything that
//! does not decode is compared as a plain string.

use crate::value::{Mapping, Node};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::{Digest, Sha256};
use std::net::{Ipv4Addr, Ipv6Addr};
use x509_parser::certificate::X509Certificate;
use x509_parser::extensions::GeneralName;

/// Shortest base64 text worth trying as DER. Real certificates are far
/// longer, this just skips ordinary strings cheaply.
const MIN_DER_BASE64_LEN: usize = 256;

/// CertificateSummary holds the fields compared between certificates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateSummary {
    pub subject: String,
    pub issuer: String,
    pub serial: String,
    pub not_before: String,
    pub not_after: String,
    pub subject_alt_names: Vec<String>,
    /// SHA-256 of the DER SubjectPublicKeyInfo, hex encoded.
    pub public_key_fingerprint: String,
}

impl CertificateSummary {
    /// Builds the synthetic mapping the diff engine walks.
    pub fn to_node(&self) -> Node {
        let mut mapping = Mapping::new();
        mapping.set("subject".into(), Node::string(&self.subject));
        mapping.set("issuer".into(), Node::string(&self.issuer));
        mapping.set("serial".into(), Node::string(&self.serial));
        mapping.set("notBefore".into(), Node::string(&self.not_before));
        mapping.set("notAfter".into(), Node::string(&self.not_after));
        mapping.set(
            "subjectAltNames".into(),
            Node::Sequence(self.subject_alt_names.iter().map(Node::string).collect()),
        );
        mapping.set(
            "publicKeyFingerprint".into(),
            Node::string(&self.public_key_fingerprint),
        );
        Node::Mapping(mapping)
    }
}

/// Decodes a PEM certificate, or base64 encoded DER, from `text`.
///
/// Returns `None` for anything that is not a certificate.
pub fn decode(text: &str) -> Option<CertificateSummary> {
    let trimmed = text.trim();
    if trimmed.starts_with("-----BEGIN") {
        let (_, pem) = x509_parser::pem::parse_x509_pem(trimmed.as_bytes()).ok()?;
        let cert = pem.parse_x509().ok()?;
        return Some(summarize(&cert));
    }

    let compact: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.len() < MIN_DER_BASE64_LEN {
        return None;
    }
    let der = STANDARD.decode(compact.as_bytes()).ok()?;
    let (_, cert) = x509_parser::parse_x509_certificate(&der).ok()?;
    Some(summarize(&cert))
}

fn summarize(cert: &X509Certificate<'_>) -> CertificateSummary {
    let validity = cert.validity();
    let subject_alt_names = match cert.subject_alternative_name() {
        Ok(Some(extension)) => extension
            .value
            .general_names
            .iter()
            .map(general_name_text)
            .collect(),
        _ => Vec::new(),
    };

    CertificateSummary {
        subject: cert.subject().to_string(),
        issuer: cert.issuer().to_string(),
        serial: cert.raw_serial_as_string(),
        not_before: validity.not_before.to_string(),
        not_after: validity.not_after.to_string(),
        subject_alt_names,
        public_key_fingerprint: hex::encode(Sha256::digest(cert.public_key().raw)),
    }
}

fn general_name_text(name: &GeneralName<'_>) -> String {
    match name {
        GeneralName::DNSName(dns) => format!("DNS:{}", dns),
        GeneralName::RFC822Name(email) => format!("email:{}", email),
        GeneralName::URI(uri) => format!("URI:{}", uri),
        GeneralName::IPAddress(bytes) => format!("IP:{}", ip_text(bytes)),
        GeneralName::DirectoryName(dir) => format!("DirName:{}", dir),
        other => format!("{:?}", other),
    }
}

fn ip_text(bytes: &[u8]) -> String {
    if let Ok(octets) = <[u8; 4]>::try_from(bytes) {
        Ipv4Addr::from(octets).to_string()
    } else if let Ok(octets) = <[u8; 16]>::try_from(bytes) {
        Ipv6Addr::from(octets).to_string()
    } else {
        hex::encode(bytes)
    }
}
