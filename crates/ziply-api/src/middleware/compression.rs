//! Response compression layer.

use tower_http::compression::CompressionLayer;
use tower_http::compression::predicate::{And, DefaultPredicate, NotForContentType, Predicate};

/// Predicate used by [`build_compression_layer`].
pub type CompressionPredicate = And<And<DefaultPredicate, NotForContentType>, NotForContentType>;

/// Builds a gzip compression layer. Blob bodies that are already compressed
/// archives or opaque binaries are passed through untouched.
pub fn build_compression_layer() -> CompressionLayer<CompressionPredicate> {
    CompressionLayer::new().compress_when(
        DefaultPredicate::new()
            .and(NotForContentType::const_new("application/octet-stream"))
            .and(NotForContentType::const_new("application/zip")),
    )
}
