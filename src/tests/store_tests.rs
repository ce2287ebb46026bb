//! tests/store_tests.rs
//! Pruebas de `MessageService` contra SQLite real.

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use actix_rt::test;
    use futures_util::future::join_all;

    use crate::models::message_model::{Channel, OutboundMessage};
    use crate::services::message_service::{connect_pool, open_store, MessageService};
    use crate::tests::test_store;

    #[test]
    async fn test_append_assigns_id_and_timestamps() {
        let (_dir, service, _pool) = test_store().await;

        let msg = OutboundMessage::sms("+1555", "hi");
        let record = service.append(msg.clone()).await.expect("append failed");

        assert_eq!(record.channel(), Channel::Sms);
        assert_eq!(record.payload, msg);
        assert!(!record.id.is_empty());
        assert_eq!(record.created_at, record.updated_at);
    }

    #[test]
    async fn test_sms_scenario() {
        let (_dir, service, _pool) = test_store().await;

        let record = service
            .append(OutboundMessage::sms("+1555", "hi"))
            .await
            .unwrap();

        let sms = service.list_by_channel(Channel::Sms).await.unwrap();
        assert_eq!(sms[0], record);

        let email = service.list_by_channel(Channel::Email).await.unwrap();
        assert!(email.iter().all(|r| r.id != record.id));
    }

    #[test]
    async fn test_list_is_reverse_insertion_order() {
        let (_dir, service, _pool) = test_store().await;

        let mut ids = vec![];
        for to in ["a@example.com", "b@example.com", "c@example.com"] {
            ids.push(service.append(OutboundMessage::email(to)).await.unwrap().id);
        }

        let listed: Vec<String> = service
            .list_by_channel(Channel::Email)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        ids.reverse();
        assert_eq!(listed, ids);

        // append y re-listar antepone el nuevo
        let newest = service
            .append(OutboundMessage::email("d@example.com"))
            .await
            .unwrap();
        let relisted = service.list_by_channel(Channel::Email).await.unwrap();
        assert_eq!(relisted[0].id, newest.id);
        assert_eq!(relisted.len(), 4);
        assert!(relisted
            .windows(2)
            .all(|w| w[0].created_at >= w[1].created_at));
    }

    #[test]
    async fn test_list_filters_by_channel() {
        let (_dir, service, _pool) = test_store().await;

        service.append(OutboundMessage::email("x@example.com")).await.unwrap();
        service.append(OutboundMessage::sms("+1", "uno")).await.unwrap();
        service.append(OutboundMessage::whatsapp("+2", "dos")).await.unwrap();
        service.append(OutboundMessage::whatsapp("+3", "tres")).await.unwrap();

        for channel in Channel::ALL {
            let records = service.list_by_channel(channel).await.unwrap();
            assert!(records.iter().all(|r| r.channel() == channel));
        }
        assert_eq!(service.list_by_channel(Channel::Whatsapp).await.unwrap().len(), 2);
    }

    #[test]
    async fn test_empty_channel_is_not_an_error() {
        let (_dir, service, _pool) = test_store().await;
        let records = service.list_by_channel(Channel::Sms).await.unwrap();
        assert!(records.is_empty());
    }

    #[test]
    async fn test_repeated_lists_are_stable() {
        let (_dir, service, _pool) = test_store().await;
        for i in 0..6 {
            service
                .append(OutboundMessage::sms("+1555", format!("m{i}")))
                .await
                .unwrap();
        }
        let first = service.list_by_channel(Channel::Sms).await.unwrap();
        let second = service.list_by_channel(Channel::Sms).await.unwrap();
        assert_eq!(first, second);
    }

    #[test]
    async fn test_concurrent_appends_are_all_visible() {
        let (_dir, service, _pool) = test_store().await;

        let tasks = (0..20).map(|i| {
            let svc = service.clone();
            async move {
                let msg = if i % 2 == 0 {
                    OutboundMessage::sms(format!("+{i}"), "paralelo")
                } else {
                    OutboundMessage::whatsapp(format!("+{i}"), "paralelo")
                };
                svc.append(msg).await
            }
        });
        let results = join_all(tasks).await;
        let ids: HashSet<String> = results
            .into_iter()
            .map(|r| r.expect("append failed").id)
            .collect();
        assert_eq!(ids.len(), 20);

        let sms = service.list_by_channel(Channel::Sms).await.unwrap();
        let wa = service.list_by_channel(Channel::Whatsapp).await.unwrap();
        assert_eq!(sms.len() + wa.len(), 20);
        assert!(sms.iter().chain(wa.iter()).all(|r| ids.contains(&r.id)));
    }

    #[test]
    async fn test_records_survive_reopen() {
        let (dir, service, pool) = test_store().await;
        let record = service
            .append(OutboundMessage::email("persist@example.com"))
            .await
            .unwrap();
        pool.close().await;

        let url = format!("sqlite://{}", dir.path().join("messages.db").display());
        let reopened = MessageService::new(connect_pool(&url, 1).await.unwrap());
        reopened.run_migrations().await.unwrap();

        let records = reopened.list_by_channel(Channel::Email).await.unwrap();
        assert_eq!(records, vec![record]);
    }

    #[test]
    async fn test_check_constraint_rejects_unknown_type() {
        let (_dir, _service, pool) = test_store().await;
        let res = sqlx::query(
            "INSERT INTO messages (id, type, created_at, updated_at) VALUES ('x', 'fax', 'a', 'a')",
        )
        .execute(&pool)
        .await;
        assert!(res.is_err());
    }

    #[test]
    async fn test_closed_pool_is_store_unavailable() {
        let (_dir, service, pool) = test_store().await;
        pool.close().await;

        let err = service
            .append(OutboundMessage::sms("+1", "x"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::MessageError::StoreUnavailable(_)
        ));
        assert!(service.list_by_channel(Channel::Sms).await.is_err());
        assert!(service.ping().await.is_err());
    }

    #[test]
    async fn test_open_store_creates_dirs_and_migrates() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("nested/data/messages.db").display());

        let service = open_store(&url, 2).await.expect("open_store failed");
        service.append(OutboundMessage::sms("+1", "ok")).await.unwrap();
        assert!(dir.path().join("nested/data/messages.db").exists());
    }

    #[test]
    async fn test_open_store_fails_when_directory_cannot_be_created() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let url = format!("sqlite://{}", blocker.join("messages.db").display());

        assert!(open_store(&url, 1).await.is_err());
    }

    #[test]
    async fn test_open_store_fails_on_unopenable_database() {
        let dir = tempfile::tempdir().unwrap();
        // Un directorio no es un archivo SQLite
        let url = format!("sqlite://{}", dir.path().display());
        assert!(open_store(&url, 1).await.is_err());
    }
}
