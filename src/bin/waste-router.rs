use waste_routing::app;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    app::run()
}
