//! Fire-and-forget side effects. Every failure here is logged and swallowed;
//! nothing in this module may touch game state.

use wasm_bindgen::JsValue;

/// Invoke the page-level `confetti` hook (canvas-confetti style) if one is
/// installed.
pub(crate) fn shoot_confetti() {
    let window = gloo::utils::window();
    match js_sys::Reflect::get(&window, &JsValue::from_str("confetti")) {
        Ok(hook) if hook.is_function() => {
            let hook = js_sys::Function::from(hook);
            let opts = js_sys::Object::new();
            let assignments = [
                ("particleCount", JsValue::from_f64(1000.0)),
                ("spread", JsValue::from_f64(160.0)),
            ];
            for (key, value) in assignments {
                let _ = js_sys::Reflect::set(&opts, &JsValue::from_str(key), &value);
            }
            if let Err(err) = hook.call1(&JsValue::NULL, &opts) {
                log::warn!("confetti call failed: {:?}", err);
            }
        }
        _ => log::debug!("no confetti hook installed"),
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum SoundCue {
    Match,
    Win,
    Bomb,
}

impl SoundCue {
    const fn src(self) -> &'static str {
        use SoundCue::*;
        match self {
            Match => "/sounds/match.mp3",
            Win => "/sounds/win.mp3",
            Bomb => "/sounds/bomb.mp3",
        }
    }
}

pub(crate) fn play_cue(cue: SoundCue) {
    match web_sys::HtmlAudioElement::new_with_src(cue.src()) {
        Ok(audio) => {
            if let Err(err) = audio.play() {
                log::warn!("audio play failed for {:?}: {:?}", cue, err);
            }
        }
        Err(err) => log::warn!("audio element failed for {:?}: {:?}", cue, err),
    }
}
