use crate::dom::MediaElement;
use crate::scene::message::Attributes;

/// Bring a media element in line with the declared `playing` / `volume` attributes.
///
/// Each attribute is applied only when present. A NaN volume becomes `0`; other values are
/// written as given, including ones outside `[0, 1]`.
pub fn sync_media(element: &mut dyn MediaElement, attrs: &Attributes) {
    match attrs.playing {
        Some(true) => element.play(),
        Some(false) => element.pause(),
        None => {}
    }

    if let Some(volume) = attrs.volume {
        element.set_volume(coerce_volume(volume));
    }
}

fn coerce_volume(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/sync.rs"]
mod tests;
