use serde::Serialize;
use serde::de::DeserializeOwned;

/// Key under which a value lives in local storage.
pub(crate) trait StorageKey {
    const KEY: &'static str;
}

/// Load-or-default / save helpers over local storage.
pub(crate) trait LocalOrDefault: Sized {
    fn local_or_default() -> Self;
    fn local_save(&self);
}

impl<T> LocalOrDefault for T
where
    T: StorageKey + Serialize + DeserializeOwned + Default,
{
    fn local_or_default() -> Self {
        use gloo::storage::{LocalStorage, Storage};
        LocalStorage::get(Self::KEY).unwrap_or_default()
    }

    fn local_save(&self) {
        use gloo::storage::{LocalStorage, Storage};
        if let Err(err) = LocalStorage::set(Self::KEY, self) {
            log::warn!("failed to save {}: {:?}", Self::KEY, err);
        }
    }
}

/// Helper function to use JavaScript's Math.random
pub(crate) fn js_random_seed() -> u64 {
    use js_sys::Math::random;
    u64::from_be_bytes([
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
    ])
}
