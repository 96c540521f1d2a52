use still_life::config::SceneConfig;

fn main() -> anyhow::Result<()> {
    still_life::flow::run(SceneConfig::from_env())
}
