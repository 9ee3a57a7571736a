use tokio::sync::mpsc::{channel, Receiver, Sender};

use crate::APP_NAME;

pub struct NotificationRequest {
    pub title: String,
    pub body: String,
}

/// Where notification requests end up. The desktop shell implements this
/// over its toast/notification facility.
pub trait NotificationSink: Send + Sync {
    fn show(&self, title: &str, body: &str) -> anyhow::Result<()>;
}

#[derive(Clone)]
pub struct Notifications(Sender<NotificationRequest>);

impl Notifications {
    /// A notification handle plus the raw request stream, for hosts (and
    /// tests) that drain the channel themselves instead of passing a sink to
    /// [`start_notification_service`].
    pub fn channel() -> (Self, Receiver<NotificationRequest>) {
        let (tx, rx) = channel::<NotificationRequest>(100);
        (Self(tx), rx)
    }

    pub async fn send_with_default_title(&self, body: impl Into<String>) {
        self.send(APP_NAME, body).await
    }

    /// Request a notification, if it fails to send then we log an error.
    /// Should only be used for non-critical notifications.
    pub async fn send(&self, title: impl Into<String>, body: impl Into<String>) {
        if let Err(e) = self.try_send(title, body).await {
            tracing::error!("Failed to send notification to task: {:?}", e);
        }
    }

    /// Request a notification, returning an error if the notification service
    /// could not be sent the request. Note that this function being successful
    /// does not guarantee that the notification will appear since the handling
    /// of notifications is managed by a separate task.
    pub async fn try_send(
        &self,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> anyhow::Result<()> {
        self.0
            .send(NotificationRequest {
                title: title.into(),
                body: body.into(),
            })
            .await?;

        Ok(())
    }
}

pub fn start_notification_service(sink: impl NotificationSink + 'static) -> Notifications {
    let (notifications, mut rx) = Notifications::channel();

    tokio::task::spawn(async move {
        while let Some(req) = rx.recv().await {
            if let Err(e) = sink.show(&req.title, &req.body) {
                tracing::error!("Failed to show desktop notification: {:?}", e);
            }
        }
    });

    notifications
}
