use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use uuid::Uuid;

static SEQ: AtomicU64 = AtomicU64::new(0);

/// `<prefix><unix millis>-<process sequence>-<8 random hex chars>`.
///
/// Unique within one running process; across processes it relies on the
/// clock and the random suffix.
pub fn new_id(prefix: &str) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let seq = SEQ.fetch_add(1, Ordering::Relaxed);
    let random = Uuid::new_v4().simple().to_string();
    format!("{}{}-{}-{}", prefix, millis, seq, &random[..8])
}

/// RFC 3339 timestamp for `*At` fields.
pub fn now_stamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_keep_prefix_and_do_not_collide() {
        let ids: HashSet<String> = (0..1000).map(|_| new_id("EC-")).collect();
        assert_eq!(ids.len(), 1000);
        assert!(ids.iter().all(|id| id.starts_with("EC-")));
    }
}
