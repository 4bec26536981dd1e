use std::time::Duration;
use xprint_usb::{DEFAULT_BRAND, DEFAULT_VENDOR_IDS, KnownVendorSet};

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | HTTP_HOST | 0.0.0.0 | Bind address |
/// | HTTP_PORT | 8000 | HTTP port |
/// | USB_TIMEOUT_MS | 5000 | Device open / transfer timeout |
/// | PRINTER_VENDOR_IDS | 0x0483,0x5740,0x04B8 | Known vendor ids (hex or decimal) |
/// | PRINTER_BRAND | Xprinter | Manufacturer substring |
/// | SERIALIZE_PRINT_JOBS | true | One job at a time on the device |
/// | LOG_LEVEL | info | Max log level |
/// | LOG_DIR | (unset) | Daily rolling log directory |
///
/// # Example
///
/// ```ignore
/// HTTP_PORT=9000 PRINTER_VENDOR_IDS=0x0483,0x1fc9 cargo run -p xprint-server
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub http_host: String,
    pub http_port: u16,
    /// Timeout for opening the printer and each transfer (ms)
    pub usb_timeout_ms: u64,
    pub vendor_ids: Vec<u16>,
    pub brand: String,
    /// Wrap the whole pipeline in a device lock
    pub serialize_print_jobs: bool,
    pub log_level: String,
    pub log_dir: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset or unparseable values fall back to defaults.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            http_host: var("HTTP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            http_port: var("HTTP_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            usb_timeout_ms: var("USB_TIMEOUT_MS")
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            vendor_ids: var("PRINTER_VENDOR_IDS")
                .map(|v| parse_vendor_ids(&v))
                .filter(|ids| !ids.is_empty())
                .unwrap_or_else(|| DEFAULT_VENDOR_IDS.to_vec()),
            brand: var("PRINTER_BRAND")
                .filter(|b| !b.is_empty())
                .unwrap_or_else(|| DEFAULT_BRAND.into()),
            serialize_print_jobs: var("SERIALIZE_PRINT_JOBS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_dir: var("LOG_DIR"),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }

    pub fn usb_timeout(&self) -> Duration {
        Duration::from_millis(self.usb_timeout_ms)
    }

    pub fn known_vendors(&self) -> KnownVendorSet {
        KnownVendorSet::new(self.vendor_ids.clone(), self.brand.clone())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Parse a comma separated vendor id list
///
/// Accepts `0x`-prefixed hex and plain decimal. Entries that fail to
/// parse are skipped.
pub fn parse_vendor_ids(value: &str) -> Vec<u16> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            let parsed = match entry
                .strip_prefix("0x")
                .or_else(|| entry.strip_prefix("0X"))
            {
                Some(hex) => u16::from_str_radix(hex, 16),
                None => entry.parse(),
            };
            if parsed.is_err() {
                tracing::warn!(entry, "Ignoring invalid vendor id");
            }
            parsed.ok()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);
        assert_eq!(config.bind_addr(), "0.0.0.0:8000");
        assert_eq!(config.usb_timeout(), Duration::from_millis(5000));
        assert_eq!(config.vendor_ids, vec![0x0483, 0x5740, 0x04B8]);
        assert_eq!(config.brand, "Xprinter");
        assert!(config.serialize_print_jobs);
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("HTTP_PORT", "9100"),
            ("USB_TIMEOUT_MS", "1500"),
            ("PRINTER_VENDOR_IDS", "0x1fc9, 1155"),
            ("PRINTER_BRAND", "Rongta"),
            ("SERIALIZE_PRINT_JOBS", "false"),
        ]);
        assert_eq!(config.http_port, 9100);
        assert_eq!(config.usb_timeout_ms, 1500);
        assert_eq!(config.vendor_ids, vec![0x1fc9, 1155]);
        assert_eq!(config.brand, "Rongta");
        assert!(!config.serialize_print_jobs);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config(&[
            ("HTTP_PORT", "eighty"),
            ("PRINTER_VENDOR_IDS", "zz, 0xZZ"),
            ("SERIALIZE_PRINT_JOBS", "maybe"),
        ]);
        assert_eq!(config.http_port, 8000);
        assert_eq!(config.vendor_ids, DEFAULT_VENDOR_IDS.to_vec());
        assert!(config.serialize_print_jobs);
    }

    #[test]
    fn test_parse_vendor_ids_skips_bad_entries() {
        assert_eq!(parse_vendor_ids("0x0483,bogus,,0X04b8,70000"), vec![0x0483, 0x04B8]);
    }

    #[test]
    fn test_known_vendors() {
        let vendors = config(&[("PRINTER_VENDOR_IDS", "0x0fe6")]).known_vendors();
        assert!(vendors.contains_vendor(0x0fe6));
        assert!(!vendors.contains_vendor(0x0483));
        assert!(vendors.matches_manufacturer("Xprinter"));
    }
}
