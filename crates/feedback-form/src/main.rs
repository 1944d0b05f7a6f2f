fn main() -> anyhow::Result<()> {
    feedback_form::cli::main()
}
