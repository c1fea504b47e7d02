//! Process-wide client installation
//!
//! Kept in its own test binary so no other test observes the global.

mod test_helpers;

use bbs_fetch::cache::MemoryCache;
use bbs_fetch::{Client, FetchEngine, FetchError};
use test_helpers::*;

#[tokio::test]
async fn test_global_client_lifecycle() {
    let err = FetchEngine::from_global(BOARD, THREAD).unwrap_err();
    assert_eq!(err, FetchError::NotInitialized);
    assert!(err.is_precondition());

    let client = start_client(test_config(), MockTransport::new(), MemoryCache::new()).await;
    Client::install_global(client.clone()).unwrap();

    let engine = FetchEngine::from_global(BOARD, THREAD).unwrap();
    assert_eq!(engine.target().server(), SERVER);

    let other = start_client(test_config(), MockTransport::new(), MemoryCache::new()).await;
    assert!(Client::install_global(other).is_err());
}
