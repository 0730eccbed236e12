// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! A line-oriented session over the certificate form.

use std::{str::FromStr, sync::Arc};

use certauth_base::ensure;
use certauth_client::{config::NetworkConfig, form::CertificateForm, render::FormView};
use certauth_ethereum::wallet::WalletProvider;
use tokio::io::{AsyncBufRead, AsyncBufReadExt as _};
use tracing::warn;

const HELP: &str = "\
Commands:
  connect             connect the first account of the wallet
  disconnect          forget the account and every result
  owner <text>        set the owner name
  description <text>  set the description
  create              create a certificate in the background
  hash <hex>          set the certificate hash to look up
  retrieve            look up the certificate hash
  show                print the form
  help                print this message
  quit                leave the session";

/// An action typed by the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormCommand {
    Connect,
    Disconnect,
    OwnerName(String),
    Description(String),
    Create,
    Hash(String),
    Retrieve,
    Show,
    Help,
    Quit,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseCommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command {0:?}")]
    Unknown(String),
    #[error("command {0:?} takes no argument")]
    UnexpectedArgument(String),
}

impl FromStr for FormCommand {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (keyword, argument) = match line.split_once(char::is_whitespace) {
            Some((keyword, argument)) => (keyword, argument.trim()),
            None => (line, ""),
        };
        let command = match keyword {
            "" => return Err(ParseCommandError::Empty),
            "owner" => return Ok(FormCommand::OwnerName(argument.to_string())),
            "description" => return Ok(FormCommand::Description(argument.to_string())),
            "hash" => return Ok(FormCommand::Hash(argument.to_string())),
            "connect" => FormCommand::Connect,
            "disconnect" => FormCommand::Disconnect,
            "create" => FormCommand::Create,
            "retrieve" => FormCommand::Retrieve,
            "show" => FormCommand::Show,
            "help" => FormCommand::Help,
            "quit" | "exit" => FormCommand::Quit,
            _ => return Err(ParseCommandError::Unknown(keyword.to_string())),
        };
        ensure!(
            argument.is_empty(),
            ParseCommandError::UnexpectedArgument(keyword.to_string())
        );
        Ok(command)
    }
}

/// Reads commands from `input` until it ends or the user quits, printing the form after
/// each action.
///
/// Certificates are created in the background so that the session keeps accepting
/// commands while a transaction waits for confirmation.
pub async fn run<W, R>(
    form: Arc<CertificateForm<W>>,
    config: &NetworkConfig,
    input: R,
) -> anyhow::Result<()>
where
    W: WalletProvider + 'static,
    R: AsyncBufRead + Unpin,
{
    println!("{}", FormView::new(&form.state().await, config));
    println!("{HELP}");

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let command = match line.parse::<FormCommand>() {
            Ok(command) => command,
            Err(ParseCommandError::Empty) => continue,
            Err(error) => {
                println!("{error}. Type `help` for the list of commands.");
                continue;
            }
        };
        // Failed operations are recorded in the form and printed with it.
        match command {
            FormCommand::Connect => {
                let _ = form.connect().await;
            }
            FormCommand::Disconnect => form.disconnect().await,
            FormCommand::OwnerName(owner_name) => form.set_owner_name(owner_name).await,
            FormCommand::Description(description) => form.set_description(description).await,
            FormCommand::Create => {
                spawn_submission(form.clone(), config.clone());
                println!("Certificate submitted.");
                continue;
            }
            FormCommand::Hash(query) => form.set_lookup_query(query).await,
            FormCommand::Retrieve => {
                let _ = form.lookup().await;
            }
            FormCommand::Show => {}
            FormCommand::Help => {
                println!("{HELP}");
                continue;
            }
            FormCommand::Quit => break,
        }
        println!("{}", FormView::new(&form.state().await, config));
    }

    let pending = form.state().await.in_flight_submissions;
    if pending > 0 {
        warn!(pending, "Leaving before every transaction was confirmed");
    }
    Ok(())
}

fn spawn_submission<W>(form: Arc<CertificateForm<W>>, config: NetworkConfig)
where
    W: WalletProvider + 'static,
{
    tokio::spawn(async move {
        match form.submit().await {
            Ok(submission) => {
                println!("Certificate Hash: {}", submission.certificate_hash);
                println!(
                    "Transaction: {}",
                    config.explorer_link(&submission.transaction_hash)
                );
            }
            Err(error) => println!("Creation failed: {error}"),
        }
    });
}
