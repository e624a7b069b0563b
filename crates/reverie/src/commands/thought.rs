//! Thought command - record, inspect and remove thoughts.

use anyhow::{Context as _, Result, bail};
use clap::{Args, Subcommand};
use console::{Style, style};

use reverie_thoughts::{
    BotId, Content, IndexSync, NewThought, SubjectId, Thought, ThoughtId, ThoughtUpdate,
};

use super::Context;

/// Arguments for the thought command.
#[derive(Args, Debug)]
pub struct ThoughtArgs {
    #[command(subcommand)]
    pub command: ThoughtCommand,
}

#[derive(Subcommand, Debug)]
pub enum ThoughtCommand {
    /// Record a new thought
    Add {
        /// Short summary of the thought
        brief: String,

        /// Bot recording the thought
        #[arg(long, env = "REVERIE_BOT_ID")]
        bot: BotId,

        /// Structured content as a JSON object
        #[arg(long)]
        content: Option<String>,

        /// Importance (default: 50)
        #[arg(short, long)]
        importance: Option<i32>,

        /// Thought type, e.g. Reflection
        #[arg(long = "type")]
        kind: Option<String>,

        /// Subject type: Project or Person
        #[arg(long)]
        subject_type: Option<String>,

        /// Existing subject ID
        #[arg(long)]
        subject_id: Option<SubjectId>,

        /// Subject name (created if it doesn't exist)
        #[arg(long)]
        subject_name: Option<String>,
    },

    /// Show a thought
    Show {
        /// Thought ID
        id: ThoughtId,
    },

    /// List recent thoughts
    List {
        /// Only thoughts of this bot
        #[arg(long, env = "REVERIE_BOT_ID")]
        bot: Option<BotId>,

        /// Maximum thoughts to show
        #[arg(short, long, default_value = "20")]
        limit: usize,

        /// Thoughts to skip
        #[arg(long, default_value = "0")]
        offset: usize,
    },

    /// Change a thought and re-sync its index document
    Update {
        /// Thought ID
        id: ThoughtId,

        /// New brief
        #[arg(long)]
        brief: Option<String>,

        /// New content as a JSON object
        #[arg(long)]
        content: Option<String>,

        /// New importance
        #[arg(short, long)]
        importance: Option<i32>,
    },

    /// Delete a thought and its index document
    Delete {
        /// Thought ID
        id: ThoughtId,
    },
}

/// Run the thought command.
pub fn run(args: ThoughtArgs, ctx: &Context) -> Result<()> {
    let service = ctx.open_service()?;

    match args.command {
        ThoughtCommand::Add {
            brief,
            bot,
            content,
            importance,
            kind,
            subject_type,
            subject_id,
            subject_name,
        } => {
            let params = NewThought {
                bot_id: Some(bot),
                brief,
                content: parse_content(content.as_deref())?.unwrap_or_default(),
                importance,
                kind,
                subject_type,
                subject_id,
                subject_name,
            };

            let created = service.create(params)?;
            report(ctx, "Thought created", &created.value, created.index)
        }
        ThoughtCommand::Show { id } => {
            let Some(thought) = service.get(id)? else {
                bail!("thought {} not found", id);
            };

            if ctx.json_output {
                println!("{}", serde_json::to_string_pretty(&thought)?);
            } else {
                print_details(&thought)?;
            }
            Ok(())
        }
        ThoughtCommand::List { bot, limit, offset } => {
            let thoughts = service.list(bot, limit, offset)?;

            if ctx.json_output {
                println!("{}", serde_json::to_string_pretty(&thoughts)?);
                return Ok(());
            }

            let dim = Style::new().dim();
            println!("{}", style("Thoughts").bold());
            println!("{}", dim.apply_to("─".repeat(50)));
            println!();

            if thoughts.is_empty() {
                println!("{}", dim.apply_to("No thoughts found"));
            }
            for thought in &thoughts {
                let id = thought.id.to_string();
                println!(
                    "{} {}",
                    dim.apply_to(format!("[{}]", &id[..8])),
                    truncate(&thought.brief_with_timestamp(), 80)
                );
            }
            Ok(())
        }
        ThoughtCommand::Update {
            id,
            brief,
            content,
            importance,
        } => {
            let update = ThoughtUpdate {
                brief,
                content: parse_content(content.as_deref())?,
                importance,
            };
            if update.is_empty() {
                bail!("nothing to update: pass --brief, --content or --importance");
            }

            let updated = service.update(id, update)?;
            report(ctx, "Thought updated", &updated.value, updated.index)
        }
        ThoughtCommand::Delete { id } => {
            let destroyed = service.destroy(id)?;
            report(ctx, "Thought deleted", &destroyed.value, destroyed.index)
        }
    }
}

/// Print the result of a write, flagging an index that didn't sync.
fn report(ctx: &Context, action: &str, thought: &Thought, index: IndexSync) -> Result<()> {
    if ctx.json_output {
        let mut value = serde_json::to_value(thought)?;
        if let Some(object) = value.as_object_mut() {
            object.insert("index_sync".into(), format!("{:?}", index).to_lowercase().into());
        }
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let dim = Style::new().dim();
    println!(
        "{} {}: {}",
        Style::new().green().apply_to("✓"),
        action,
        dim.apply_to(thought.id)
    );

    match index {
        IndexSync::Synced => {
            if ctx.verbose {
                println!("{}", dim.apply_to("Vector index in sync"));
            }
        }
        IndexSync::Failed => {
            eprintln!(
                "{} vector index not updated (see logs)",
                Style::new().yellow().apply_to("Warning:")
            );
        }
        IndexSync::Skipped => {
            if ctx.verbose {
                println!("{}", dim.apply_to("Vector index disabled"));
            }
        }
    }
    Ok(())
}

fn print_details(thought: &Thought) -> Result<()> {
    let dim = Style::new().dim();

    println!("{}", style(thought.brief_with_timestamp()).bold());
    println!("{}", dim.apply_to("─".repeat(50)));
    println!("{:<12} {}", dim.apply_to("ID"), thought.id);
    if let Some(type_name) = thought.kind.type_name() {
        println!("{:<12} {}", dim.apply_to("Type"), type_name);
    }
    println!("{:<12} {}", dim.apply_to("Bot"), thought.bot_id);
    println!("{:<12} {}", dim.apply_to("Importance"), thought.importance);
    if let Some(subject) = &thought.subject {
        println!(
            "{:<12} {} {}",
            dim.apply_to("Subject"),
            subject.kind(),
            subject.id()
        );
    }
    println!(
        "{:<12} {}",
        dim.apply_to("Updated"),
        thought.updated_at.format(reverie_thoughts::TIMESTAMP_FORMAT)
    );

    if !thought.content.is_empty() {
        println!();
        println!("{}", serde_json::to_string_pretty(&thought.content)?);
    }
    Ok(())
}

/// Parse `--content` as a JSON object.
fn parse_content(raw: Option<&str>) -> Result<Option<Content>> {
    raw.map(|raw| serde_json::from_str::<Content>(raw).context("--content must be a JSON object"))
        .transpose()
}

fn truncate(s: &str, max_len: usize) -> String {
    let s = s.replace('\n', " ");
    if s.chars().count() <= max_len {
        s
    } else {
        let cut: String = s.chars().take(max_len - 3).collect();
        format!("{}...", cut)
    }
}
