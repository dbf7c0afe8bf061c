//! Editing session lifecycle.

use gridtone_core::{Field, ImageProperties};
use gridtone_render::{RenderConfig, RenderError, RenderSurface};
use tracing::{debug, info, warn};

use crate::record::PostRecord;
use crate::service::{AuthService, PersistenceService};
use crate::{SessionError, SessionResult};

/// One post open for editing.
///
/// Holds the working copy of the properties, drives a [`RenderSurface`]
/// with them and talks to the store on reset and save. The preview can be
/// switched to the unedited defaults without losing the working copy.
pub struct EditSession<P: PersistenceService> {
    store: P,
    record: PostRecord,
    props: ImageProperties,
    edits_visible: bool,
    surface: RenderSurface,
}

impl<P: PersistenceService> EditSession<P> {
    /// Opens post `id` with a surface built from `config`.
    pub fn open(store: P, id: &str, config: RenderConfig) -> SessionResult<Self> {
        let surface = RenderSurface::from_config(config)?;
        Self::with_surface(store, id, surface)
    }

    /// Opens post `id` on a caller-provided surface.
    pub fn with_surface(store: P, id: &str, mut surface: RenderSurface) -> SessionResult<Self> {
        let record = store.get_post(id)?;
        let bytes = store.fetch_image(&record.image_url)?;
        surface.load_texture(&bytes)?;
        let props = record.properties.clone();
        surface.submit(props.clone());
        info!(id, backend = surface.backend_name(), "editing session opened");
        Ok(Self {
            store,
            record,
            props,
            edits_visible: true,
            surface,
        })
    }

    /// Post id.
    pub fn id(&self) -> &str {
        &self.record.id
    }

    /// The post as last loaded or saved.
    pub fn record(&self) -> &PostRecord {
        &self.record
    }

    /// Working copy of the properties.
    pub fn properties(&self) -> &ImageProperties {
        &self.props
    }

    /// Returns `true` if the working copy differs from the stored record.
    pub fn has_unsaved_changes(&self) -> bool {
        self.props != self.record.properties
    }

    /// Sets one numeric field (clamped to its slider range).
    pub fn set_field(&mut self, field: Field, value: f32) {
        self.props.set(field, value);
        self.refresh();
    }

    /// Sets a field by wire name from text, `lut` included.
    pub fn assign(&mut self, name: &str, value: &str) -> SessionResult<()> {
        self.props.assign(name, value)?;
        self.refresh();
        Ok(())
    }

    /// Selects a LUT, `None` for none.
    pub fn set_lut(&mut self, lut: Option<String>) {
        self.props.lut = lut;
        self.refresh();
    }

    /// Replaces the whole working copy.
    pub fn set_properties(&mut self, props: ImageProperties) {
        self.props = props;
        self.refresh();
    }

    /// Whether the preview shows the edits or the defaults.
    pub fn edits_visible(&self) -> bool {
        self.edits_visible
    }

    /// Switches the preview between the edits and the defaults.
    pub fn set_edits_visible(&mut self, visible: bool) {
        self.edits_visible = visible;
        self.refresh();
    }

    fn refresh(&mut self) {
        let preview = if self.edits_visible {
            self.props.clone()
        } else {
            ImageProperties::default()
        };
        self.surface.submit(preview);
    }

    /// Per-frame callback for the preview surface.
    pub fn tick(&mut self) -> SessionResult<bool> {
        Ok(self.surface.tick()?)
    }

    /// The preview surface.
    pub fn surface(&self) -> &RenderSurface {
        &self.surface
    }

    /// The preview surface, mutably.
    pub fn surface_mut(&mut self) -> &mut RenderSurface {
        &mut self.surface
    }

    /// The backing store.
    pub fn store(&self) -> &P {
        &self.store
    }

    /// Closes the session and returns the store.
    pub fn into_store(self) -> P {
        self.store
    }

    /// Drops all edits: the store deletes the edited render and restores
    /// defaults, and the working copy follows.
    pub fn reset(&mut self) -> SessionResult<()> {
        self.record = self.store.reset_post(&self.record.id)?;
        self.props = ImageProperties::default();
        self.refresh();
        info!(id = %self.record.id, "post reset");
        Ok(())
    }

    /// Renders the working copy, uploads it and writes every property.
    ///
    /// The capture always uses the edits, even while the preview shows the
    /// defaults. Returns the URL of the saved render.
    pub fn save(&mut self, auth: &dyn AuthService) -> SessionResult<String> {
        let user = auth.current_user().ok_or(SessionError::Unauthorized)?;

        self.surface.submit(self.props.clone());
        let capture = self.surface.capture_frame();
        if let Some(err) = self.surface.take_lut_error() {
            warn!(id = %self.record.id, error = %err, "saving without LUT");
        }
        self.refresh();
        let png = capture?;

        let url = self.store.save_post(&self.record.id, &png, &self.props)?;
        self.record = self.store.get_post(&self.record.id)?;
        info!(id = %self.record.id, user = %user.id, url = %url, bytes = png.len(), "post saved");
        Ok(url)
    }

    /// Takes the failure of the selected LUT, if it could not be used.
    pub fn take_lut_error(&mut self) -> Option<RenderError> {
        let err = self.surface.take_lut_error();
        if let Some(e) = &err {
            debug!(error = %e, "LUT error taken");
        }
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryPersistence;
    use crate::service::StaticAuth;
    use gridtone_core::Image;
    use gridtone_render::{CpuBackend, encode_png};

    fn session() -> EditSession<InMemoryPersistence> {
        let mut store = InMemoryPersistence::new();
        let png = encode_png(&Image::filled(2, 2, [0.2, 0.4, 0.6, 1.0])).unwrap();
        store.create_post("p", &png).unwrap();
        let config = RenderConfig {
            lut_dir: std::env::temp_dir().join("gridtone-session-no-luts"),
            ..Default::default()
        };
        let surface = RenderSurface::new(config, Box::new(CpuBackend::new()));
        EditSession::with_surface(store, "p", surface).unwrap()
    }

    #[test]
    fn edits_are_unsaved_until_save() {
        let mut s = session();
        assert!(!s.has_unsaved_changes());
        s.set_field(Field::Contrast, 140.0);
        assert!(s.has_unsaved_changes());
        s.save(&StaticAuth::signed_in("u")).unwrap();
        assert!(!s.has_unsaved_changes());
        assert_eq!(s.record().properties.contrast, 140.0);
    }

    #[test]
    fn hiding_edits_keeps_working_copy() {
        let mut s = session();
        s.set_field(Field::Saturation, 0.0);
        s.set_edits_visible(false);
        assert_eq!(s.surface().properties(), &ImageProperties::default());
        assert_eq!(s.properties().saturation, 0.0);
        s.set_edits_visible(true);
        assert_eq!(s.surface().properties().saturation, 0.0);
    }

    #[test]
    fn signed_out_save_is_rejected() {
        let mut s = session();
        assert!(matches!(
            s.save(&StaticAuth::anonymous()),
            Err(SessionError::Unauthorized)
        ));
        assert!(s.record().edited_url.is_none());
    }

    #[test]
    fn set_field_clamps() {
        let mut s = session();
        s.set_field(Field::Brightness, 500.0);
        assert_eq!(s.properties().brightness, 200.0);
    }
}
