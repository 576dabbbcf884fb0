use lightbox::{stage, ui};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut app = lightbox::default();
    stage::build(app.scene_mut());
    app.set_ui(ui::panel::lighting_panel);
    app.run()
}
