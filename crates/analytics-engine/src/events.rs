//! Derived notifications and the processing timeline.
//!
//! Both views are recomputed from metadata on every call and capped at
//! the ten most recent entries. Ids are assigned positionally after
//! sorting so repeated derivation over the same corpus is
//! byte-identical.

use shared_types::{DocumentMetadata, ProcessingStatus};

use crate::views::{Notification, TimelineEvent};

const VIEW_CAP: usize = 10;

/// Derive user notifications from the corpus.
///
/// Rules: a high-risk notice when a document has at least one
/// high-severity clause, a completion notice for every completed
/// document, and a low-compliance notice when a completed document
/// scored under 70.
pub fn notifications(docs: &[DocumentMetadata]) -> Vec<Notification> {
    let mut notifications = Vec::new();

    for doc in docs {
        let completed = doc.processing_status == ProcessingStatus::Completed;

        if doc.high_risk_count > 0 {
            notifications.push(Notification {
                id: String::new(),
                kind: "warning",
                title: "High Risk Clause Detected",
                message: format!(
                    "{} high-risk clause(s) detected in {}",
                    doc.high_risk_count, doc.filename
                ),
                timestamp: doc.activity_at(),
                read: false,
                priority: "high",
                document_id: doc.document_id.clone(),
            });
        }

        if completed {
            notifications.push(Notification {
                id: String::new(),
                kind: "success",
                title: "Document Processing Complete",
                message: format!(
                    "{} has been successfully analyzed with {}% compliance",
                    doc.filename, doc.compliance_rate
                ),
                timestamp: doc.activity_at(),
                read: false,
                priority: "medium",
                document_id: doc.document_id.clone(),
            });
        }

        if completed && doc.compliance_rate < 70.0 {
            notifications.push(Notification {
                id: String::new(),
                kind: "error",
                title: "Low Compliance Score",
                message: format!(
                    "{} has a compliance score of {}%. Review required.",
                    doc.filename, doc.compliance_rate
                ),
                timestamp: doc.activity_at(),
                read: false,
                priority: "high",
                document_id: doc.document_id.clone(),
            });
        }
    }

    sort_desc_and_cap(&mut notifications, |n| {
        (n.timestamp, n.document_id.clone(), n.kind)
    });
    for (i, notification) in notifications.iter_mut().enumerate() {
        notification.id = format!("notif_{:03}", i + 1);
    }
    notifications
}

/// Derive the processing timeline: an upload event per document, a
/// completion event for finished documents, and an in-flight event for
/// documents still being worked on.
pub fn timeline(docs: &[DocumentMetadata]) -> Vec<TimelineEvent> {
    let mut events = Vec::new();

    for doc in docs {
        events.push(TimelineEvent {
            id: String::new(),
            kind: "upload",
            title: "Document Uploaded",
            description: format!("{} uploaded for processing", doc.filename),
            timestamp: doc.uploaded_at,
            document_id: doc.document_id.clone(),
            status: "completed",
        });

        match doc.processing_status {
            ProcessingStatus::Completed => {
                if let Some(processed_at) = doc.processed_at {
                    events.push(TimelineEvent {
                        id: String::new(),
                        kind: "completed",
                        title: "Analysis Complete",
                        description: format!(
                            "Compliance analysis finished with {}% compliance rate for {}",
                            doc.compliance_rate, doc.filename
                        ),
                        timestamp: processed_at,
                        document_id: doc.document_id.clone(),
                        status: "completed",
                    });
                }
            }
            ProcessingStatus::Started | ProcessingStatus::Processing => {
                events.push(TimelineEvent {
                    id: String::new(),
                    kind: "processing",
                    title: "Document Processing",
                    description: format!("Currently analyzing {} for compliance", doc.filename),
                    timestamp: doc.uploaded_at,
                    document_id: doc.document_id.clone(),
                    status: "processing",
                });
            }
            ProcessingStatus::Failed => {}
        }
    }

    sort_desc_and_cap(&mut events, |e| (e.timestamp, e.document_id.clone(), e.kind));
    for (i, event) in events.iter_mut().enumerate() {
        event.id = format!("event_{:03}", i + 1);
    }
    events
}

/// Sort newest-first with a deterministic tiebreak, then cap.
fn sort_desc_and_cap<T, K: Ord>(items: &mut Vec<T>, key: impl Fn(&T) -> K) {
    items.sort_by(|a, b| key(b).cmp(&key(a)));
    items.truncate(VIEW_CAP);
}
