use async_trait::async_trait;
use chrono::Utc;
use herald_core::{
    comm::{CommStatus, Communication, NewCommunication},
    error::HeraldError,
    traits::CommunicationStore,
};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

/// Communications held in insertion order behind an async lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<Communication>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CommunicationStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn add(&self, communication: NewCommunication) -> Result<String, HeraldError> {
        let id = Uuid::new_v4().to_string();
        let record = Communication::from_new(id.clone(), communication, Utc::now());
        info!(
            "Stored {} communication {id} on {} as {:?}",
            record.comm_type, record.channel, record.status
        );
        self.records.write().await.push(record);
        Ok(id)
    }

    async fn get(&self, id: &str) -> Result<Option<Communication>, HeraldError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|c| c.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Communication>, HeraldError> {
        Ok(self.records.read().await.clone())
    }

    async fn update_status(&self, id: &str, status: CommStatus) -> Result<(), HeraldError> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| HeraldError::Store(format!("communication not found: {id}")))?;
        info!("Communication {id}: {:?} -> {status:?}", record.status);
        record.status = status;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_core::comm::CommType;
    use herald_core::compose::{ComposeOtp, ComposePayload, ComposeSms};
    use herald_core::message::{Channel, ChannelOption};
    use herald_core::schedule::Schedule;

    fn sms(comm_type: CommType) -> NewCommunication {
        NewCommunication {
            comm_type,
            channel: Channel::Sms,
            compose: ComposePayload::Sms(ComposeSms {
                service_communication: false,
                internal_name: "Spring promo".to_string(),
                segment_id: "seg_all".to_string(),
                from_sender_id: "sms_sc_1".to_string(),
                message_text: "Hello {{first_name}}!".to_string(),
                media: Vec::new(),
                compliance_line: Some("Text STOP to opt out".to_string()),
                offer_ids: Vec::new(),
            }),
            schedule: Schedule::inert(),
            compliance_line: Some("Text STOP to opt out".to_string()),
        }
    }

    fn otp() -> NewCommunication {
        NewCommunication {
            comm_type: CommType::AuthenticationOtp,
            channel: Channel::Sms,
            compose: ComposePayload::Otp(ComposeOtp {
                channel: ChannelOption::Auto,
                recipient_e164: "+447700900123".to_string(),
                code_length: 6,
                expiry_minutes: 5,
                wa_template_id: None,
            }),
            schedule: Schedule::inert(),
            compliance_line: None,
        }
    }

    #[tokio::test]
    async fn test_add_and_get() {
        let store = MemoryStore::new();
        let id = store.add(sms(CommType::Campaign)).await.unwrap();
        let stored = store.get(&id).await.unwrap().expect("stored record");
        assert_eq!(stored.id, id);
        assert_eq!(stored.status, CommStatus::Draft);
        assert_eq!(stored.compose.display_name(), "Spring promo");
        assert!(store.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_otp_stored_as_sent() {
        let store = MemoryStore::new();
        let id = store.add(otp()).await.unwrap();
        let stored = store.get(&id).await.unwrap().unwrap();
        assert_eq!(stored.status, CommStatus::Sent);
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let store = MemoryStore::new();
        let a = store.add(sms(CommType::Campaign)).await.unwrap();
        let b = store.add(otp()).await.unwrap();
        let ids: Vec<String> = store.list().await.unwrap().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[tokio::test]
    async fn test_update_status() {
        let store = MemoryStore::new();
        let id = store.add(sms(CommType::Automated)).await.unwrap();
        store.update_status(&id, CommStatus::Paused).await.unwrap();
        assert_eq!(
            store.get(&id).await.unwrap().unwrap().status,
            CommStatus::Paused
        );
    }

    #[tokio::test]
    async fn test_update_unknown_is_store_error() {
        let store = MemoryStore::new();
        let err = store
            .update_status("nope", CommStatus::Sent)
            .await
            .unwrap_err();
        assert!(matches!(err, HeraldError::Store(_)));
    }

    #[tokio::test]
    async fn test_concurrent_adds() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = std::sync::Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.add(sms(CommType::TriggeredPoints)).await.unwrap()
            }));
        }
        for h in handles {
            h.await.unwrap();
        }
        assert_eq!(store.list().await.unwrap().len(), 8);
        assert_eq!(store.name(), "memory");
    }
}
