use reqwest::StatusCode;
use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};
use tokio::sync::{oneshot, Notify};

use crate::{
    cache::{Cache, CacheKey},
    Error,
};

fn failure() -> Error {
    Error::Request {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        detail: Some("boom".to_owned()),
    }
}

#[tokio::test]
async fn concurrent_reads_share_one_fetch() {
    let cache = Cache::default();
    let fetches = &AtomicUsize::new(0);
    let fetch = move || async move {
        fetches.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        Ok::<_, Error>(vec![1u64, 2, 3])
    };

    let (a, b) = tokio::join!(
        cache.get(&CacheKey::Events, fetch),
        cache.get(&CacheKey::Events, fetch)
    );

    assert_eq!(*a.unwrap(), vec![1, 2, 3]);
    assert_eq!(*b.unwrap(), vec![1, 2, 3]);
    assert_eq!(fetches.load(Ordering::SeqCst), 1);
    assert!(cache.is_fresh(&CacheKey::Events));
}

#[tokio::test]
async fn invalidation_forces_refetch() {
    let cache = Cache::default();
    let fetches = &AtomicUsize::new(0);
    let fetch = move || async move { Ok::<_, Error>(fetches.fetch_add(1, Ordering::SeqCst)) };

    assert_eq!(*cache.get(&CacheKey::Campuses, fetch).await.unwrap(), 0);
    assert_eq!(*cache.get(&CacheKey::Campuses, fetch).await.unwrap(), 0);

    cache.invalidate(&CacheKey::Campuses);
    assert!(!cache.is_fresh(&CacheKey::Campuses));
    assert_eq!(*cache.get(&CacheKey::Campuses, fetch).await.unwrap(), 1);

    cache.invalidate_where(|key| key.concerns_event(3));
    assert!(cache.is_fresh(&CacheKey::Campuses));
}

#[tokio::test]
async fn invalidated_while_in_flight() {
    let cache = Cache::default();
    let key = CacheKey::Authorizations(7);
    let (started_tx, started_rx) = oneshot::channel();
    let release = Notify::new();
    let release = &release;

    let read = cache.get(&key, move || async move {
        started_tx.send(()).unwrap();
        release.notified().await;
        Ok::<_, Error>("stale")
    });
    let control = async {
        started_rx.await.unwrap();
        cache.invalidate(&key);
        release.notify_one();
    };
    let (value, ()) = tokio::join!(read, control);

    // The caller gets its response, but it is never marked fresh.
    assert_eq!(*value.unwrap(), "stale");
    assert!(!cache.is_fresh(&key));

    let value = cache
        .get(&key, || async { Ok::<_, Error>("current") })
        .await
        .unwrap();
    assert_eq!(*value, "current");
    assert!(cache.is_fresh(&key));
}

#[tokio::test]
async fn failure_is_shared_but_not_poisoning() {
    let cache = Cache::default();
    let fetches = &AtomicUsize::new(0);

    let failing = move || async move {
        fetches.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        Err::<u32, _>(failure())
    };
    let (a, b) = tokio::join!(
        cache.get(&CacheKey::Users, failing),
        cache.get(&CacheKey::Users, failing)
    );
    assert!(matches!(a, Err(Error::Request { .. })));
    assert!(matches!(b, Err(Error::Request { .. })));
    assert_eq!(fetches.load(Ordering::SeqCst), 1);

    // Other keys are unaffected.
    assert_eq!(
        *cache
            .get(&CacheKey::Campuses, || async { Ok::<_, Error>(5u32) })
            .await
            .unwrap(),
        5
    );

    // A later read of the failed key tries again.
    assert_eq!(
        *cache
            .get(&CacheKey::Users, || async { Ok::<_, Error>(8u32) })
            .await
            .unwrap(),
        8
    );
}

#[tokio::test]
async fn update_in_place() {
    let cache = Cache::default();
    let key = CacheKey::Authorizations(1);

    assert!(
        !cache
            .update(&key, |list: &mut Vec<u32>| {
                list.push(1);
                true
            })
            .await
    );

    cache
        .get(&key, || async { Ok::<_, Error>(vec![1u32]) })
        .await
        .unwrap();
    let mut changes = cache.subscribe(&key);

    assert!(
        cache
            .update(&key, |list: &mut Vec<u32>| {
                list.push(2);
                true
            })
            .await
    );
    assert!(changes.has_changed().unwrap());
    changes.borrow_and_update();

    assert!(!cache.update(&key, |_: &mut Vec<u32>| false).await);
    assert!(!changes.has_changed().unwrap());

    let list = cache
        .get(&key, || async { Ok::<_, Error>(Vec::<u32>::new()) })
        .await
        .unwrap();
    assert_eq!(*list, vec![1, 2]);
}

#[tokio::test]
async fn expires_after_max_age() {
    let cache = Cache::new(Some(Duration::from_millis(10)));
    cache
        .get(&CacheKey::Events, || async { Ok::<_, Error>(1u32) })
        .await
        .unwrap();
    assert!(cache.is_fresh(&CacheKey::Events));

    tokio::time::sleep(Duration::from_millis(30)).await;
    assert!(!cache.is_fresh(&CacheKey::Events));
    assert_eq!(
        *cache
            .get(&CacheKey::Events, || async { Ok::<_, Error>(2u32) })
            .await
            .unwrap(),
        2
    );
}
