use glsandbox::{app, DemoKind};

fn main() -> anyhow::Result<()> {
    app::run(DemoKind::Grid)
}
