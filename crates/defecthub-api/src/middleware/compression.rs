//! Response compression layer.

use tower_http::compression::predicate::{DefaultPredicate, NotForContentType, Predicate};
use tower_http::compression::CompressionLayer;

/// Gzip for API responses. Images are skipped by the default predicate;
/// opaque binaries and PDFs are skipped as well since they rarely shrink.
pub fn build_compression_layer() -> CompressionLayer<impl Predicate> {
    CompressionLayer::new().gzip(true).compress_when(
        DefaultPredicate::new()
            .and(NotForContentType::const_new("application/octet-stream"))
            .and(NotForContentType::const_new("application/pdf")),
    )
}
