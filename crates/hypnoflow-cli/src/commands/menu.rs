use clap::Args;
use hypnoflow_core::ExerciseKind;

#[derive(Args)]
pub struct MenuArgs {
    /// Print full exercise definitions as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: MenuArgs) -> Result<(), Box<dyn std::error::Error>> {
    let definitions: Vec<_> = ExerciseKind::ALL.iter().map(|k| k.definition()).collect();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&definitions)?);
        return Ok(());
    }
    for def in &definitions {
        println!("{:<10} {:<22} {}", def.kind().slug(), def.title(), def.subtitle());
    }
    Ok(())
}
