use anyhow::Result;
use moons::{
    build_model, make_moons, plot_decision_boundary, ModelHyperparameters, PlotConfig,
    TrainingContext,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

const SEED: u64 = 0;
const NUM_EXAMPLES: usize = 200;
const NOISE: f64 = 0.20;
const OUTPUT_PATH: &str = "decision_boundary.png";

fn install_logger() -> Result<()> {
    let subscriber = tracing_subscriber::fmt().compact().finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn main() -> Result<()> {
    install_logger()?;

    let mut rng = StdRng::seed_from_u64(SEED);
    let dataset = make_moons(NUM_EXAMPLES, NOISE, &mut rng)?;

    let hyperparameters = ModelHyperparameters::default()
        .with_hidden_dim(6)
        .with_num_passes(40_000)
        .with_print_loss(1000)
        .with_seed(SEED);
    let ctx = TrainingContext::new(&dataset, &hyperparameters);
    let trained = build_model(&ctx)?;

    let model = &trained.model;
    plot_decision_boundary(|x| model.predict(x), &dataset, &PlotConfig::default(), OUTPUT_PATH)?;
    info!(
        "Decision boundary for hidden layer size {} written to {}",
        hyperparameters.hidden_dim, OUTPUT_PATH
    );

    Ok(())
}
