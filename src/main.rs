//! CLI entry point for sprout

use std::fmt;
use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, ValueEnum};
use sprout::numbering::UnknownScheme;
use sprout::output::{
    JsonFormatter, MarkdownFormatter, TableFormatter, TextFormatter, flat_rows, print_markdown,
};
use sprout::{
    AdjacencyTree, ConfigError, Key, NodeStore, OutputConfig, Record, RenderError, SproutConfig,
    TreeError, View, ViewConfig, emit, print_json, render_html,
};

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            std::io::stdout().is_terminal()
        }
    }
}

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Nested markup from the view templates
    #[default]
    Html,
    /// Console tree with connectors
    Text,
    /// Nested markdown list
    Markdown,
    /// Nested JSON tree
    Json,
    /// Flat JSON rows in pre-order with computed columns
    Rows,
    /// Aligned plain-text table of the sorted rows
    Table,
    /// HTML table of the sorted rows
    HtmlTable,
}

#[derive(Parser, Debug)]
#[command(name = "sprout")]
#[command(about = "Turn a flat parent-pointer table into an ordered, rendered tree")]
#[command(version)]
struct Args {
    /// JSON file holding an array of row objects (stdin when omitted or "-")
    file: Option<PathBuf>,

    /// Column holding each row's id
    #[arg(long = "index", value_name = "FIELD")]
    index: Option<String>,

    /// Column holding the parent's id
    #[arg(long = "parent", value_name = "FIELD")]
    parent: Option<String>,

    /// Parent value that marks a root, as a JSON literal (0, "0", null)
    /// Text that is not a JSON literal is taken as a string
    #[arg(long = "root", value_name = "VALUE")]
    root: Option<String>,

    /// Expose the number of direct children as the `children` column
    #[arg(long = "count-children")]
    count_children: bool,

    /// Compute the number of descendants as the `descendants` column
    #[arg(long = "count-descendants")]
    count_descendants: bool,

    /// Compute hierarchical numbering (`child_number`, `numbering`)
    #[arg(short = 'n', long = "number")]
    number: bool,

    /// Numbering schemes, e.g. "default=decimal,1=lower-latin" (implies --number)
    #[arg(long = "numbering", value_name = "SCHEMES")]
    numbering: Option<String>,

    /// Delimiter between numbering levels (implies --number)
    #[arg(long = "delimiter", value_name = "TEXT")]
    delimiter: Option<String>,

    /// Include the visited branch in cycle errors
    #[arg(long = "debug")]
    debug: bool,

    /// Build the traversal while rendering instead of in a separate pass
    #[arg(long = "fused")]
    fused: bool,

    /// Rows are already linearized; NEXT_FIELD names their successor column
    #[arg(long = "linked", value_name = "NEXT_FIELD")]
    linked: Option<String>,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value_t = Format::Html)]
    format: Format,

    /// JSON file with view templates for HTML output
    #[arg(long = "view", value_name = "FILE")]
    view: Option<PathBuf>,

    /// JSON config file; command-line flags override its values
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// When to use colors
    #[arg(long = "color", value_enum, default_value_t = ColorMode::Auto)]
    color: ColorMode,

    /// Columns to show next to each node (text, markdown, tables)
    #[arg(long = "columns", value_name = "LIST", value_delimiter = ',')]
    columns: Vec<String>,
}

#[derive(Debug)]
enum CliError {
    Io(io::Error),
    Input(serde_json::Error),
    Config(ConfigError),
    View(regex::Error),
    Numbering(UnknownScheme),
    Tree(TreeError),
    Render(RenderError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "{}", e),
            CliError::Input(e) => write!(f, "invalid input: {}", e),
            CliError::Config(e) => write!(f, "{}", e),
            CliError::View(e) => write!(f, "invalid view splitter: {}", e),
            CliError::Numbering(e) => write!(f, "{}", e),
            CliError::Tree(e) => write!(f, "{}", e),
            CliError::Render(e) => write!(f, "{}", e),
        }
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Input(e)
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<regex::Error> for CliError {
    fn from(e: regex::Error) -> Self {
        CliError::View(e)
    }
}

impl From<UnknownScheme> for CliError {
    fn from(e: UnknownScheme) -> Self {
        CliError::Numbering(e)
    }
}

impl From<TreeError> for CliError {
    fn from(e: TreeError) -> Self {
        CliError::Tree(e)
    }
}

impl From<RenderError> for CliError {
    fn from(e: RenderError) -> Self {
        CliError::Render(e)
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("sprout: {}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    let config = resolve_config(args)?;
    let records = read_records(args.file.as_deref())?;
    log::debug!("read {} rows", records.len());

    let tree_config = config.to_tree_config();
    let flags = tree_config.flags;
    let mut tree = match &args.linked {
        Some(next_field) => {
            let store = NodeStore::from_linked(
                records,
                &config.index,
                &config.parent,
                next_field,
                &config.root,
            )?;
            AdjacencyTree::from_store(store, tree_config)
        }
        None => AdjacencyTree::new(records, tree_config),
    };

    let output_config = OutputConfig::new(flags).with_columns(args.columns.clone());

    match args.format {
        Format::Html => {
            let view = View::new(&config.view, flags)?;
            let html = render_html(&mut tree, view)?;
            println!("{}", html);
        }
        Format::Text => {
            let mut formatter =
                TextFormatter::stdout(output_config.with_color(should_use_color(args.color)));
            emit(&mut tree, &mut formatter)?;
        }
        Format::Markdown => {
            let mut formatter = MarkdownFormatter::new(output_config);
            emit(&mut tree, &mut formatter)?;
            print_markdown(formatter);
        }
        Format::Json => {
            let mut formatter = JsonFormatter::new(flags);
            emit(&mut tree, &mut formatter)?;
            print_json(&formatter.into_roots())?;
        }
        Format::Rows => {
            tree.linearize()?;
            print_json(&flat_rows(&tree)?)?;
        }
        Format::Table | Format::HtmlTable => {
            tree.linearize()?;
            let table = TableFormatter::from_tree(&tree, &args.columns)?;
            if args.format == Format::Table {
                print!("{}", table.to_plain());
            } else {
                print!("{}", table.to_html());
            }
        }
    }
    Ok(())
}

/// Config file values, then command-line overrides.
fn resolve_config(args: &Args) -> Result<SproutConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => SproutConfig::load(path)?,
        None => SproutConfig::default(),
    };

    if let Some(index) = &args.index {
        config.index = index.clone();
    }
    if let Some(parent) = &args.parent {
        config.parent = parent.clone();
    }
    if let Some(root) = &args.root {
        config.root = Key::parse_literal(root);
    }

    config.count_children |= args.count_children;
    config.count_descendants |= args.count_descendants;
    config.debug |= args.debug;
    config.fused |= args.fused;
    config.number |= args.number;

    if let Some(schemes) = &args.numbering {
        config.numbering.parse_schemes(schemes)?;
        config.number = true;
    }
    if let Some(delimiter) = &args.delimiter {
        config.numbering.delimiter = delimiter.clone();
        config.number = true;
    }

    if let Some(path) = &args.view {
        config.view = load_view(path)?;
    }
    Ok(config)
}

fn load_view(path: &Path) -> Result<ViewConfig, CliError> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn read_records(path: Option<&Path>) -> Result<Vec<Record>, CliError> {
    let text = match path {
        Some(p) if p != Path::new("-") => fs::read_to_string(p).map_err(|e| {
            io::Error::new(e.kind(), format!("cannot read '{}': {}", p.display(), e))
        })?,
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    Ok(serde_json::from_str(&text)?)
}
