use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use frag_crypto::DEFAULT_CHUNK_SIZE;

#[derive(Parser)]
#[command(
    name = "frag",
    about = "frag: content-addressed document chunk store",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML configuration file; environment variables override it
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Apply the index schema migration
    Migrate,
    /// Split a file into chunks and print their digests and keys
    Digest(DigestArgs),
    /// Emit a POST /write request body for a file
    Encode(EncodeArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// Listen address, overriding configuration and FRAG_BIND
    #[arg(long)]
    pub bind: Option<SocketAddr>,
}

#[derive(Args)]
pub struct DigestArgs {
    pub file: PathBuf,
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,
}

#[derive(Args)]
pub struct EncodeArgs {
    pub file: PathBuf,
    #[arg(long)]
    pub doc_id: String,
    #[arg(long)]
    pub mime: Option<String>,
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_serve() {
        let cli = Cli::try_parse_from(["frag", "serve"]).unwrap();
        if let Command::Serve(args) = cli.command {
            assert!(args.bind.is_none());
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_serve_with_config_and_bind() {
        let cli = Cli::try_parse_from([
            "frag", "--config", "frag.toml", "serve", "--bind", "0.0.0.0:9000",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("frag.toml")));
        if let Command::Serve(args) = cli.command {
            assert_eq!(args.bind.unwrap().port(), 9000);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_migrate() {
        let cli = Cli::try_parse_from(["frag", "migrate", "-v"]).unwrap();
        assert!(matches!(cli.command, Command::Migrate));
        assert!(cli.verbose);
    }

    #[test]
    fn parse_digest_default_chunk_size() {
        let cli = Cli::try_parse_from(["frag", "digest", "notes.txt"]).unwrap();
        if let Command::Digest(args) = cli.command {
            assert_eq!(args.file, PathBuf::from("notes.txt"));
            assert_eq!(args.chunk_size, 131_072);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_encode() {
        let cli = Cli::try_parse_from([
            "frag", "encode", "a.md", "--doc-id", "a", "--mime", "text/markdown",
            "--chunk-size", "1024", "--format", "json",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        if let Command::Encode(args) = cli.command {
            assert_eq!(args.doc_id, "a");
            assert_eq!(args.mime.as_deref(), Some("text/markdown"));
            assert_eq!(args.chunk_size, 1024);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn encode_requires_doc_id() {
        assert!(Cli::try_parse_from(["frag", "encode", "a.md"]).is_err());
    }
}
