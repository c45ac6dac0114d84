use glob::glob;
use pessoas::actors::message::StoreError;
use pessoas::actors::store_actor_sqlite::StoreConfig;
use pessoas::pessoa::model::Pessoa;
use pessoas::pessoa::store::PessoaStore;
use pessoas::utils::ids::new_id;
use std::fs;
use test_log::test;
use tokio::runtime::Runtime;

fn delete_db_files(db_file_prefix: &str) {
    for entry in glob(&format!("{db_file_prefix}*")).unwrap() {
        let path = entry.unwrap();
        tracing::debug!("deleting {path:?} before starting store test");
        fs::remove_file(path).unwrap();
    }
}

async fn memory_store() -> PessoaStore {
    PessoaStore::initialize(8, &StoreConfig::memory())
        .await
        .unwrap()
}

#[test(tokio::test)]
async fn test_insert_and_get() {
    let store = memory_store().await;
    let id = new_id();

    store.insert(id.clone(), "Ana".to_string(), 30).await.unwrap();

    let found = store.get_by_id(&id).await.unwrap();
    assert_eq!(found, Some(Pessoa::new(id, "Ana".to_string(), 30)));

    assert_eq!(store.get_by_id("nope").await.unwrap(), None);
}

#[test(tokio::test)]
async fn test_list_all() {
    let store = memory_store().await;
    assert!(store.list_all().await.unwrap().is_empty());

    let ids: Vec<String> = (0..3).map(|_| new_id()).collect();
    for (i, id) in ids.iter().enumerate() {
        store
            .insert(id.clone(), format!("pessoa {i}"), i64::try_from(i).unwrap())
            .await
            .unwrap();
    }

    let mut listed: Vec<String> = store
        .list_all()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    let mut expected = ids;
    listed.sort();
    expected.sort();
    assert_eq!(listed, expected);
}

#[test(tokio::test)]
async fn test_update_reports_affected_rows() {
    let store = memory_store().await;
    let ana = new_id();
    let bia = new_id();
    store.insert(ana.clone(), "Ana".to_string(), 30).await.unwrap();
    store.insert(bia.clone(), "Bia".to_string(), 25).await.unwrap();

    let count = store
        .update_by_id(&ana, "Ana Maria".to_string(), 31)
        .await
        .unwrap();
    assert_eq!(count, 1);

    let count = store
        .update_by_id("nope", "Ninguém".to_string(), 1)
        .await
        .unwrap();
    assert_eq!(count, 0);

    assert_eq!(
        store.get_by_id(&ana).await.unwrap(),
        Some(Pessoa::new(ana, "Ana Maria".to_string(), 31))
    );
    // the other record is untouched
    assert_eq!(
        store.get_by_id(&bia).await.unwrap(),
        Some(Pessoa::new(bia, "Bia".to_string(), 25))
    );
}

#[test(tokio::test)]
async fn test_delete_reports_affected_rows() {
    let store = memory_store().await;
    let id = new_id();
    store.insert(id.clone(), "Ana".to_string(), 30).await.unwrap();

    assert_eq!(store.delete_by_id(&id).await.unwrap(), 1);
    assert_eq!(store.delete_by_id(&id).await.unwrap(), 0);
    assert_eq!(store.get_by_id(&id).await.unwrap(), None);
}

#[test(tokio::test)]
async fn test_duplicate_id_is_a_store_error() {
    let store = memory_store().await;
    let id = new_id();
    store.insert(id.clone(), "Ana".to_string(), 30).await.unwrap();

    let result = store.insert(id.clone(), "Bia".to_string(), 25).await;
    assert!(
        matches!(result, Err(StoreError::Database(_))),
        "expected a database error, got {result:?}"
    );

    // the first record survives
    assert_eq!(
        store.get_by_id(&id).await.unwrap().map(|p| p.nome),
        Some("Ana".to_string())
    );
}

#[test(tokio::test)]
async fn test_closed_store_is_unavailable() {
    let store = memory_store().await;
    store.shutdown().await.unwrap();

    let result = store.list_all().await;
    assert!(
        matches!(result, Err(StoreError::Unavailable(_))),
        "expected unavailable, got {result:?}"
    );
    assert!(matches!(
        store.shutdown().await,
        Err(StoreError::Unavailable(_))
    ));
}

#[cfg_attr(feature = "cargo-clippy", allow(clippy::unwrap_used))]
#[test]
fn test_write_and_read_across_restarts() {
    let db_file_prefix = "/tmp/pessoas_test_restart.db";
    delete_db_files(db_file_prefix);

    let config = StoreConfig::new(Some(db_file_prefix.to_string()), false, true);
    let id = new_id();

    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        // create the db file and insert 1 record
        let store = PessoaStore::initialize(8, &config).await.unwrap();
        store.insert(id.clone(), "Ana".to_string(), 30).await.unwrap();
        store.shutdown().await.unwrap();

        // reopen the same file, the table already exists
        let store = PessoaStore::initialize(8, &config).await.unwrap();
        assert_eq!(
            store.get_by_id(&id).await.unwrap(),
            Some(Pessoa::new(id.clone(), "Ana".to_string(), 30))
        );

        store.update_by_id(&id, "Ana".to_string(), 31).await.unwrap();
        store.shutdown().await.unwrap();

        let store = PessoaStore::initialize(8, &config).await.unwrap();
        let all = store.list_all().await.unwrap();
        assert_eq!(all, vec![Pessoa::new(id.clone(), "Ana".to_string(), 31)]);
        store.shutdown().await.unwrap();
    });

    delete_db_files(db_file_prefix);
}
