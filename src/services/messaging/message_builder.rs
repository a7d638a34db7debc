//! Builds provider messages from a `MessageSpec`.
//!
//! Two shapes exist. `data-only` puts everything into the `data` section.
//! `notification-data` splits visible fields into `notification` and keeps
//! `link` in `data`, where the receiving app can act on it.

use crate::models::{CustomField, MessageSpec, MessageType, ProviderMessage};
use std::collections::BTreeMap;

const TITLE: &str = "title";
const BODY: &str = "body";
const LINK: &str = "link";
const IMAGE: &str = "image";

/// Constructs the provider message for `spec`.
///
/// Pure and infallible: token presence is checked by the relay, not here,
/// so the same function can back the preview endpoint.
pub fn build_message(spec: &MessageSpec) -> ProviderMessage {
    match spec.message_type {
        MessageType::DataOnly => build_data_only(spec),
        MessageType::NotificationData => build_notification_data(spec),
    }
}

fn build_data_only(spec: &MessageSpec) -> ProviderMessage {
    let mut data = BTreeMap::new();
    let toggles = spec.toggles;

    insert_if(&mut data, TITLE, toggles.title, &spec.title);
    insert_if(&mut data, BODY, toggles.body, &spec.body);
    insert_if(&mut data, LINK, toggles.link, &spec.link);
    insert_image(&mut data, toggles.image, spec.image_url.as_deref());
    apply_custom(&mut data, &spec.data_fields);

    ProviderMessage {
        token: spec.token.clone(),
        notification: None,
        data,
    }
}

fn build_notification_data(spec: &MessageSpec) -> ProviderMessage {
    let mut notification = BTreeMap::new();
    let mut data = BTreeMap::new();
    let toggles = spec.toggles;

    insert_if(&mut notification, TITLE, toggles.title, &spec.title);
    insert_if(&mut notification, BODY, toggles.body, &spec.body);
    insert_image(&mut notification, toggles.image, spec.image_url.as_deref());
    apply_custom(&mut notification, &spec.notification_fields);
    // link belongs to the data section only
    notification.remove(LINK);

    insert_if(&mut data, LINK, toggles.link, &spec.link);
    apply_custom(&mut data, &spec.data_fields);

    ProviderMessage {
        token: spec.token.clone(),
        notification: Some(notification),
        data,
    }
}

fn insert_if(section: &mut BTreeMap<String, String>, key: &str, enabled: bool, value: &str) {
    if enabled && !value.is_empty() {
        section.insert(key.to_string(), value.to_string());
    }
}

fn insert_image(section: &mut BTreeMap<String, String>, enabled: bool, image_url: Option<&str>) {
    if let Some(url) = image_url {
        insert_if(section, IMAGE, enabled, url);
    }
}

/// Applies custom pairs in order; later keys overwrite earlier ones,
/// including the built-in fields.
fn apply_custom(section: &mut BTreeMap<String, String>, fields: &[CustomField]) {
    for field in fields.iter().filter(|f| f.is_complete()) {
        section.insert(field.key.clone(), field.value.clone());
    }
}
