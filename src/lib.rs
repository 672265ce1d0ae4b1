//! test-data-gen
//!
//! Command-line front end for the `test-data-generator` crate: loads a YAML model schema,
//! generates instances of a type expression and prints them as JSON.
//!
//! # CLI Usage
//!
//! ```bash
//! # Ten models, one JSON document per line
//! test-data-gen generate --schema models.yaml --type SimpleModel --count 10
//!
//! # A list of models with fixed container sizes, pretty printed to a file
//! test-data-gen generate --schema models.yaml --type "List<SimpleModel>" \
//!   --min-items 3 --max-items 3 --seed 42 --pretty --output models.json
//!
//! # Inspect what the generator will populate
//! test-data-gen types --schema models.yaml
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use test_data_generator::{
    GenerationConfig, GenerationConfigBuilder, SetterMapper, TestDataGenerationContext,
    TestDataGenerator,
};
use tracing::info;
use type_meta::{DefaultTypeResolver, ModelSchema, TypeDescriptor, TypeUniverse};

#[derive(Parser)]
#[command(name = "test-data-gen")]
#[command(about = "Generate populated object graphs from a YAML model schema")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate instances of a type and print them as JSON
    Generate(GenerateArgs),

    /// List the schema classes and the properties the generator populates
    Types(TypesArgs),
}

#[derive(Parser, Clone, Debug)]
pub struct SchemaOpts {
    /// YAML model schema
    #[arg(long, value_name = "PATH", env = "TEST_DATA_GEN_SCHEMA")]
    pub schema: PathBuf,
}

impl SchemaOpts {
    pub fn load(&self) -> anyhow::Result<ModelSchema> {
        ModelSchema::from_file(&self.schema)
            .with_context(|| format!("Failed to load model schema from {:?}", self.schema))
    }
}

/// Generation settings. Command-line values override the config file.
#[derive(Parser, Clone, Debug, Default)]
pub struct ConfigOpts {
    /// YAML generation config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Minimum number of container items
    #[arg(long)]
    pub min_items: Option<usize>,

    /// Maximum number of container items
    #[arg(long)]
    pub max_items: Option<usize>,

    /// Prefix of every generated string
    #[arg(long)]
    pub prefix: Option<String>,

    /// Postfix of every generated string
    #[arg(long)]
    pub postfix: Option<String>,

    /// Maximum nesting of model instances
    #[arg(long)]
    pub max_depth: Option<usize>,
}

impl ConfigOpts {
    pub fn load(&self) -> anyhow::Result<GenerationConfig> {
        let base = match &self.config {
            Some(path) => GenerationConfig::from_file(path)
                .with_context(|| format!("Failed to load generation config from {path:?}"))?,
            None => GenerationConfig::default(),
        };

        let mut builder = GenerationConfigBuilder::from(base);
        if let Some(min_items) = self.min_items {
            builder = builder.min_items(min_items);
        }
        if let Some(max_items) = self.max_items {
            builder = builder.max_items(max_items);
        }
        if let Some(prefix) = &self.prefix {
            builder = builder.prefix(prefix.as_str());
        }
        if let Some(postfix) = &self.postfix {
            builder = builder.postfix(postfix.as_str());
        }
        if let Some(max_depth) = self.max_depth {
            builder = builder.max_depth(max_depth);
        }
        builder.build().context("Invalid generation config")
    }
}

#[derive(Parser, Clone, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub schema: SchemaOpts,

    /// Type expression to generate, e.g. `List<SimpleModel>`
    #[arg(long = "type", value_name = "TYPE")]
    pub type_expr: String,

    /// Number of values to generate
    #[arg(long, default_value_t = 1)]
    pub count: usize,

    #[command(flatten)]
    pub config: ConfigOpts,

    /// Seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write to this file instead of stdout
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Pretty-print each value instead of one JSON document per line
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Parser, Clone, Debug)]
pub struct TypesArgs {
    #[command(flatten)]
    pub schema: SchemaOpts,
}

pub fn load_universe(schema: ModelSchema) -> anyhow::Result<Arc<TypeUniverse>> {
    let universe = schema
        .into_universe()
        .context("Failed to build types from model schema")?;
    Ok(Arc::new(universe))
}

/// Run `generate`, writing to `--output` or stdout.
pub fn run_generate(args: &GenerateArgs) -> anyhow::Result<()> {
    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {path:?}"))?;
            let mut out = BufWriter::new(file);
            generate(args, &mut out)?;
            out.flush()
                .with_context(|| format!("Failed to write output file {path:?}"))?;
            info!("Wrote output to {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            generate(args, &mut stdout.lock())?;
        }
    }
    Ok(())
}

/// Generate `args.count` values and write them as JSON. Returns the number written.
pub fn generate<W: Write>(args: &GenerateArgs, out: &mut W) -> anyhow::Result<usize> {
    let config = args.config.load()?;
    let universe = load_universe(args.schema.load()?)?;
    let context = Arc::new(TestDataGenerationContext::new(universe));

    let mut generator = TestDataGenerator::new(context).with_config(config);
    if let Some(seed) = args.seed {
        generator = generator.with_seed(seed);
    }

    for index in 0..args.count {
        let value = generator
            .generate(&args.type_expr)
            .with_context(|| format!("Failed to generate '{}' (value {})", args.type_expr, index + 1))?;
        let json = value.to_json();
        if args.pretty {
            serde_json::to_writer_pretty(&mut *out, &json)?;
        } else {
            serde_json::to_writer(&mut *out, &json)?;
        }
        writeln!(out)?;
    }

    info!("Generated {} value(s) of '{}'", args.count, args.type_expr);
    Ok(args.count)
}

/// Run `types`, writing to stdout.
pub fn run_types(args: &TypesArgs) -> anyhow::Result<()> {
    let stdout = io::stdout();
    describe_types(&args.schema.schema, &args.schema.load()?, &mut stdout.lock())
}

/// Write each schema class with the properties the generator populates.
pub fn describe_types<W: Write>(source: &Path, schema: &ModelSchema, out: &mut W) -> anyhow::Result<()> {
    let names: Vec<String> = schema.classes.iter().map(|class| class.name.clone()).collect();
    let universe = load_universe(schema.clone())?;
    let resolver = DefaultTypeResolver::new(universe.clone());
    let setters = SetterMapper::new();

    writeln!(out, "# {}", source.display())?;
    for name in &names {
        let Some(def) = universe.get(name) else {
            continue;
        };
        if let Some(constants) = def.enum_constants() {
            writeln!(out, "{} (enum): {}", name, constants.join(", "))?;
            continue;
        }

        writeln!(out, "{name}")?;
        let properties = setters.settable_properties(&resolver, &TypeDescriptor::of(name.as_str()));
        for property in properties.iter() {
            writeln!(
                out,
                "  {}: {} via {}",
                property.field.name, property.field_type, property.setter.name
            )?;
        }
    }
    Ok(())
}
