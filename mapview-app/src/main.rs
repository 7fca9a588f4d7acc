use mapview::{
    constants, ApiKeys, BusinessSearch, GeocodeHit, Geocoder, MapViewState, PanDirection,
    StaticMapSource,
};

/// Standalone static-map viewer application
fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Fail fast on missing keys instead of launching a viewer whose every
    // lookup is doomed.
    let keys = ApiKeys::from_env()?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1050.0, 550.0])
            .with_title("Mapview"),
        ..Default::default()
    };

    eframe::run_native(
        "mapview-app",
        options,
        Box::new(move |cc| Box::new(MapViewApp::new(cc, keys))),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {e}"))?;

    Ok(())
}

/// The main application struct
struct MapViewApp {
    view: MapViewState,
    map_source: StaticMapSource,
    geocoder: Geocoder,
    search: BusinessSearch,

    map_texture: Option<egui::TextureHandle>,
    search_text: String,
    address_text: String,
    show_postal_code: bool,
    /// Last geocoder hit, kept so the postal-code toggle can re-render the
    /// address without another request.
    last_hit: Option<GeocodeHit>,
    error_banner: Option<String>,
    needs_fetch: bool,
}

impl MapViewApp {
    fn new(_cc: &eframe::CreationContext<'_>, keys: ApiKeys) -> Self {
        Self {
            view: MapViewState::default(),
            map_source: StaticMapSource::new(),
            geocoder: Geocoder::new(keys.geocoder),
            search: BusinessSearch::new(keys.search),
            map_texture: None,
            search_text: String::new(),
            address_text: String::new(),
            show_postal_code: false,
            last_hit: None,
            error_banner: None,
            needs_fetch: true,
        }
    }

    /// Fetches and decodes the map image for the current view. On failure the
    /// last good image stays on screen and the error lands in the banner.
    fn refresh_map(&mut self, ctx: &egui::Context) {
        match self.fetch_decoded() {
            Ok(color_image) => {
                self.map_texture =
                    Some(ctx.load_texture("map", color_image, egui::TextureOptions::LINEAR));
                self.error_banner = None;
            }
            Err(e) => {
                log::warn!("map refresh failed: {e}");
                self.error_banner = Some(format!("Map request failed: {e}"));
            }
        }
    }

    fn fetch_decoded(&self) -> anyhow::Result<egui::ColorImage> {
        let bytes = self.map_source.fetch(&self.view)?;
        let decoded = image::load_from_memory(&bytes)?.to_rgba8();
        let size = [decoded.width() as usize, decoded.height() as usize];
        Ok(egui::ColorImage::from_rgba_unmultiplied(
            size,
            decoded.as_raw(),
        ))
    }

    /// Forward geocode of the search box contents.
    fn run_search(&mut self) {
        match self.geocoder.forward(&self.search_text) {
            Ok(Some(hit)) => {
                self.view.jump_to(hit.position);
                self.address_text = hit.display_address(self.show_postal_code);
                self.last_hit = Some(hit);
                self.needs_fetch = true;
            }
            Ok(None) => {
                self.address_text = "Not found".to_string();
                self.last_hit = None;
            }
            Err(e) => {
                log::warn!("search failed: {e}");
                self.error_banner = Some(format!("Search failed: {e}"));
            }
        }
    }

    /// A click inside the map image: drop the pointer there, reverse-geocode
    /// it, and (for a right click) look up the nearest business.
    fn on_map_click(&mut self, pixel_x: f64, pixel_y: f64, want_business: bool) {
        let pointer = self.view.click(pixel_x, pixel_y);
        self.needs_fetch = true;

        let hit = match self.geocoder.reverse(pointer) {
            Ok(hit) => hit,
            Err(e) => {
                log::warn!("reverse geocode failed: {e}");
                self.error_banner = Some(format!("Lookup failed: {e}"));
                return;
            }
        };

        let Some(hit) = hit else {
            self.address_text = "Not found".to_string();
            self.last_hit = None;
            return;
        };

        // The clicked point names a place: it becomes the new center.
        self.view.recenter_on_pointer();

        if want_business {
            self.search_text.clear();
            match self.search.find_nearby(pointer, &hit.name) {
                Ok(Some(business)) => self.address_text = business.display(),
                Ok(None) => self.address_text = "No businesses found nearby".to_string(),
                Err(e) => {
                    log::warn!("business search failed: {e}");
                    self.error_banner = Some(format!("Business search failed: {e}"));
                }
            }
            self.last_hit = None;
        } else {
            self.address_text = hit.display_address(self.show_postal_code);
            self.last_hit = Some(hit);
        }
    }

    fn clear(&mut self) {
        self.view.clear_pointer();
        self.search_text.clear();
        self.address_text.clear();
        self.last_hit = None;
        self.needs_fetch = true;
    }

    /// Keyboard pan/zoom/style handling. Skipped entirely while a text box
    /// has focus so typing does not drive the map around.
    fn handle_keys(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }

        ctx.input(|i| {
            for (keys, direction) in [
                ([egui::Key::ArrowLeft, egui::Key::A], PanDirection::West),
                ([egui::Key::ArrowRight, egui::Key::D], PanDirection::East),
                ([egui::Key::ArrowUp, egui::Key::W], PanDirection::North),
                ([egui::Key::ArrowDown, egui::Key::S], PanDirection::South),
            ] {
                if keys.iter().any(|k| i.key_pressed(*k)) {
                    self.view.pan(direction);
                    self.needs_fetch = true;
                }
            }

            if i.key_pressed(egui::Key::PageUp) || i.key_pressed(egui::Key::Plus) {
                if self.view.zoom < constants::PREFERRED_MAX_ZOOM {
                    self.view.zoom_in();
                    self.needs_fetch = true;
                }
            }
            if i.key_pressed(egui::Key::PageDown) || i.key_pressed(egui::Key::Minus) {
                if self.view.zoom > constants::PREFERRED_MIN_ZOOM {
                    self.view.zoom_out();
                    self.needs_fetch = true;
                }
            }
            if i.key_pressed(egui::Key::Q) {
                self.view.cycle_style();
                self.needs_fetch = true;
            }
        });
    }

    /// Wheel zoom while hovering the map image, restricted to the app's
    /// effective zoom range.
    fn handle_scroll(&mut self, ctx: &egui::Context) {
        let scroll_y = ctx.input(|i| i.raw_scroll_delta.y);
        if scroll_y == 0.0 {
            return;
        }
        let tick = if scroll_y > 0.0 { 1 } else { -1 };
        let before = self.view.zoom;
        self.view.scroll_zoom(tick);
        self.view.zoom = self
            .view
            .zoom
            .clamp(constants::PREFERRED_MIN_ZOOM, constants::PREFERRED_MAX_ZOOM);
        if self.view.zoom != before {
            self.needs_fetch = true;
        }
    }

    fn map_panel(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let map_size = egui::vec2(
            constants::VIEWPORT_WIDTH as f32,
            constants::VIEWPORT_HEIGHT as f32,
        );

        let response = match &self.map_texture {
            Some(texture) => ui.add(
                egui::Image::new(egui::load::SizedTexture::new(texture.id(), map_size))
                    .sense(egui::Sense::click()),
            ),
            None => {
                let (rect, response) = ui.allocate_exact_size(map_size, egui::Sense::click());
                ui.painter()
                    .rect_filled(rect, 0.0, egui::Color32::from_gray(40));
                response
            }
        };

        if response.hovered() {
            self.handle_scroll(ctx);
        }

        let clicked = response.clicked();
        let right_clicked = response.secondary_clicked();
        if clicked || right_clicked {
            if let Some(pos) = response.interact_pointer_pos() {
                let local = pos - response.rect.min;
                // interact_pointer_pos can land on the border; the transform
                // expects in-viewport pixels only.
                if local.x >= 0.0
                    && local.y >= 0.0
                    && local.x < map_size.x
                    && local.y < map_size.y
                {
                    self.on_map_click(local.x as f64, local.y as f64, right_clicked);
                }
            }
        }
    }

    fn controls_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Search");
        let entry = ui.text_edit_singleline(&mut self.search_text);
        if entry.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            self.run_search();
        }
        ui.horizontal(|ui| {
            if ui.button("Search").clicked() {
                self.run_search();
            }
            if ui.button("Clear").clicked() {
                self.clear();
            }
        });

        ui.separator();
        ui.label(format!("Style: {}", self.view.style.label()));
        ui.label(format!(
            "Center: {:.4}, {:.4} | Zoom: {}",
            self.view.center.lon, self.view.center.lat, self.view.zoom
        ));

        if ui
            .checkbox(&mut self.show_postal_code, "Show postal code")
            .changed()
        {
            if let Some(hit) = &self.last_hit {
                self.address_text = hit.display_address(self.show_postal_code);
            }
        }

        ui.separator();
        ui.label("Pan: WASD, arrows, mouse click");
        ui.label("Map style: Q");
        ui.label("Zoom: +, -, PageUp, PageDown, wheel");
        ui.label("Right click: nearest business");
    }
}

impl eframe::App for MapViewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_keys(ctx);

        egui::TopBottomPanel::bottom("address_panel").show(ctx, |ui| {
            if let Some(error) = self.error_banner.clone() {
                ui.horizontal(|ui| {
                    ui.colored_label(egui::Color32::LIGHT_RED, error);
                    if ui.button("Retry").clicked() {
                        self.needs_fetch = true;
                    }
                });
            }
            ui.horizontal(|ui| {
                ui.label("Address:");
                ui.label(&self.address_text);
            });
        });

        egui::SidePanel::right("controls_panel")
            .resizable(false)
            .min_width(360.0)
            .show(ctx, |ui| self.controls_panel(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            self.map_panel(ui, ctx);
        });

        if self.needs_fetch {
            self.needs_fetch = false;
            self.refresh_map(ctx);
        }
    }
}
