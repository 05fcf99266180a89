fn main() -> anyhow::Result<()> {
    hireform::init();
    hireform::cli::run()
}
