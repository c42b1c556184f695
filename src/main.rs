use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use sql2spark::{run_migration, MigrateOptions};

#[derive(Parser)]
#[command(name = "sql2spark")]
#[command(author, version, about = "Migrates Athena/Trino SQL scripts into PySpark job code")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Migrate a SQL script into a generated PySpark job file
    Migrate {
        /// Path to the source SQL script
        #[arg(short, long)]
        sql: PathBuf,

        /// Business identifier used to name the generated job file
        #[arg(short, long)]
        business_name: String,

        /// Directory for the generated artifact
        #[arg(short, long, default_value = "./output")]
        output_dir: PathBuf,

        /// Path to the tagged job template
        #[arg(short, long, default_value = "templates/spark_job_template.py")]
        template: PathBuf,

        /// Managed-table registry file (one schema.table=format entry per line)
        #[arg(long)]
        tables: Option<PathBuf>,

        /// SQL dialect the source script is written in
        #[arg(long, default_value = "generic")]
        source_dialect: String,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Migrate {
            sql,
            business_name,
            output_dir,
            template,
            tables,
            source_dialect,
            verbose,
        } => {
            let options = MigrateOptions {
                sql_path: sql,
                business_name,
                output_dir,
                template_path: template,
                tables_path: tables,
                source_dialect,
                verbose,
            };

            let output_path = run_migration(options)?;
            println!("Generated job: {}", output_path.display());
        }
    }

    Ok(())
}
