use std::path::Path;

use anyhow::{bail, Context};
use colored::Colorize;
use frag_crypto::ChunkDigests;
use frag_server::codec;
use frag_server::dto::WriteBody;
use frag_server::{FragServer, ServerConfig};
use frag_types::{ChunkKey, DocumentId};
use serde_json::json;

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(cli.config.as_deref(), args).await,
        Command::Migrate => cmd_migrate(cli.config.as_deref()).await,
        Command::Digest(args) => cmd_digest(args, cli.format),
        Command::Encode(args) => cmd_encode(args),
    }
}

async fn cmd_serve(config: Option<&Path>, args: ServeArgs) -> anyhow::Result<()> {
    let mut config = ServerConfig::load(config)?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    println!("{} frag server on {}", "→".cyan(), config.bind_addr.to_string().bold());
    FragServer::new(config).serve().await?;
    Ok(())
}

async fn cmd_migrate(config: Option<&Path>) -> anyhow::Result<()> {
    let config = ServerConfig::load(config)?;
    FragServer::new(config).migrate().await?;
    println!("{} Index schema up to date.", "✓".green().bold());
    Ok(())
}

fn cmd_digest(args: DigestArgs, format: OutputFormat) -> anyhow::Result<()> {
    let data = read_file(&args.file)?;
    let chunks = split(&data, args.chunk_size)?;
    let digests = ChunkDigests::compute(&chunks);

    match format {
        OutputFormat::Json => {
            let fragments: Vec<_> = digests
                .fragments
                .iter()
                .zip(&chunks)
                .map(|(d, c)| {
                    json!({
                        "digest": d,
                        "key": ChunkKey::for_digest(d),
                        "len": c.len(),
                    })
                })
                .collect();
            let out = json!({
                "fragments": fragments,
                "full_hash": digests.full,
                "total_bytes": digests.total_len,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            for (i, (digest, chunk)) in digests.fragments.iter().zip(&chunks).enumerate() {
                println!(
                    "{:>4}  {}  {:>7}  {}",
                    i,
                    digest.to_string().yellow(),
                    chunk.len(),
                    ChunkKey::for_digest(digest).as_str().dimmed()
                );
            }
            println!(
                "{} {} chunk(s), {} bytes, full hash {}",
                "✓".green().bold(),
                digests.len(),
                digests.total_len,
                digests.full.to_string().yellow().bold()
            );
        }
    }
    Ok(())
}

fn cmd_encode(args: EncodeArgs) -> anyhow::Result<()> {
    let data = read_file(&args.file)?;
    let body = encode_body(&args.doc_id, args.mime, &data, args.chunk_size)?;
    println!("{}", serde_json::to_string(&body)?);
    Ok(())
}

fn read_file(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("reading {}", path.display()))
}

/// Split into fixed-size chunks. An empty input yields no chunks.
fn split(data: &[u8], chunk_size: usize) -> anyhow::Result<Vec<&[u8]>> {
    if chunk_size == 0 {
        bail!("chunk size must be positive");
    }
    Ok(data.chunks(chunk_size).collect())
}

fn encode_body(
    doc_id: &str,
    mime: Option<String>,
    data: &[u8],
    chunk_size: usize,
) -> anyhow::Result<WriteBody> {
    let doc_id = DocumentId::new(doc_id)?;
    let chunks_b64 = split(data, chunk_size)?
        .into_iter()
        .map(codec::encode_chunk)
        .collect();
    Ok(WriteBody {
        doc_id: doc_id.into_inner(),
        chunks_b64,
        mime,
    })
}
