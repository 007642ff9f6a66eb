//! Elastic Cloud ID decoding.
//!
//! A cloud id is `<deployment>:<base64("host[:port]$es_uuid$kibana_uuid")>`. The
//! Elasticsearch endpoint is `https://<es_uuid>.<host>[:port]`.

use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};
use base64::Engine as _;
use url::Url;

use crate::sink::SinkError;

/// Resolve a cloud id into the deployment's Elasticsearch URL.
pub fn decode_cloud_id(cloud_id: &str) -> Result<Url, SinkError> {
    let (_, encoded) = cloud_id
        .split_once(':')
        .ok_or_else(|| SinkError::InvalidCloudId("missing ':' separator".into()))?;

    let bytes = STANDARD
        .decode(encoded)
        .or_else(|_| STANDARD_NO_PAD.decode(encoded.trim_end_matches('=')))
        .map_err(|e| SinkError::InvalidCloudId(format!("bad base64: {}", e)))?;
    let decoded = String::from_utf8(bytes)
        .map_err(|_| SinkError::InvalidCloudId("payload is not utf-8".into()))?;

    let mut parts = decoded.split('$');
    let host = parts.next().unwrap_or_default().trim_end_matches('/');
    let es_uuid = parts.next().unwrap_or_default();
    if host.is_empty() || es_uuid.is_empty() {
        return Err(SinkError::InvalidCloudId(
            "payload needs a host and an elasticsearch id".into(),
        ));
    }

    let (host, port) = match host.rsplit_once(':') {
        Some((h, p)) if p.parse::<u16>().is_ok() => (h, Some(p)),
        _ => (host, None),
    };
    let raw = match port {
        Some(port) if port != "443" => format!("https://{}.{}:{}", es_uuid, host, port),
        _ => format!("https://{}.{}", es_uuid, host),
    };

    Url::parse(&raw).map_err(|e| SinkError::InvalidCloudId(format!("bad host: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(payload: &str) -> String {
        format!("my-deployment:{}", STANDARD.encode(payload))
    }

    #[test]
    fn test_decode_cloud_id() {
        let url = decode_cloud_id(&encode("us-central1.gcp.cloud.es.io$abc123$kib456")).unwrap();
        assert_eq!(url.as_str(), "https://abc123.us-central1.gcp.cloud.es.io/");
    }

    #[test]
    fn test_decode_keeps_custom_port() {
        let url = decode_cloud_id(&encode("eu-west-1.aws.found.io:9243$es9$kb9")).unwrap();
        assert_eq!(url.as_str(), "https://es9.eu-west-1.aws.found.io:9243/");

        let default = decode_cloud_id(&encode("eu-west-1.aws.found.io:443$es9$kb9")).unwrap();
        assert_eq!(default.port(), None);
    }

    #[test]
    fn test_decode_unpadded() {
        let payload = STANDARD_NO_PAD.encode("host.example.io$es1$kb1");
        let url = decode_cloud_id(&format!("d:{}", payload)).unwrap();
        assert_eq!(url.host_str(), Some("es1.host.example.io"));
    }

    #[test]
    fn test_reject_malformed() {
        assert!(matches!(decode_cloud_id("no-separator"), Err(SinkError::InvalidCloudId(_))));
        assert!(matches!(decode_cloud_id("d:!!!notbase64"), Err(SinkError::InvalidCloudId(_))));
        assert!(matches!(decode_cloud_id(&encode("onlyhost")), Err(SinkError::InvalidCloudId(_))));
    }
}
