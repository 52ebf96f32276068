fn main() -> anyhow::Result<()> {
    mesh_carousel::flow::run()
}
