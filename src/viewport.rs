//! Port of the standalone pinch-zoom viewport fix that ships with the
//! frontend's web page. Unrelated to the launcher; kept as a pure model of
//! the page's metadata so both observable mutations stay testable.

/// Device family the page is rendered on, from the browser's user agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    IPhone,
    Other,
}

/// Scale directive for iPhones: pinned so pinch gestures cannot zoom.
pub const LOCKED_DIRECTIVE: &str = "width=device-width, minimum-scale=1.0, maximum-scale=1.0";

/// Scale directive for everything else.
pub const FREE_DIRECTIVE: &str = "width=device-width, minimum-scale=0.25, maximum-scale=1.6";

/// One metadata declaration of the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaTag {
    pub name: String,
    pub content: String,
}

impl MetaTag {
    pub fn new(name: &str, content: &str) -> Self {
        Self {
            name: name.to_string(),
            content: content.to_string(),
        }
    }
}

pub fn classify(user_agent: &str) -> Device {
    if user_agent.contains("iPhone") {
        Device::IPhone
    } else {
        Device::Other
    }
}

pub fn directive_for(device: Device) -> &'static str {
    match device {
        Device::IPhone => LOCKED_DIRECTIVE,
        Device::Other => FREE_DIRECTIVE,
    }
}

/// Run once at page load: overwrite the content of every viewport meta tag
/// with the directive for the current device. Idempotent.
pub fn apply(tags: &mut [MetaTag], device: Device) {
    for tag in tags.iter_mut().filter(|t| t.name == "viewport") {
        tag.content = directive_for(device).to_string();
    }
}

/// Whether the page should hook pinch gestures at all.
pub fn wants_gesture_listener(device: Device) -> bool {
    device == Device::IPhone
}

/// Pinch gesture handler: re-applies the locked directive. Fires on every
/// gesture for the lifetime of the page; safe to repeat because the
/// overwrite is idempotent.
pub fn on_gesture_start(tags: &mut [MetaTag]) {
    apply(tags, Device::IPhone);
}
