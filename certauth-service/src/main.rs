// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! The `certauth` command-line tool.

mod interactive;

use std::{process, sync::Arc};

use anyhow::Context as _;
use certauth_client::{
    client_options::{ClientCommand, ClientOptions},
    form::{CertificateForm, Notice},
};
use certauth_ethereum::wallet::WalletProvider as _;
use tokio::io::BufReader;
use tracing::Instrument as _;

fn main() -> anyhow::Result<()> {
    let options = ClientOptions::init();

    certauth_base::tracing::init("certauth", &options.log_config())
        .context("Failed to open the log file")?;

    let span = tracing::info_span!("certauth::main");
    let result = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to create Tokio runtime")?
        .block_on(run(options).instrument(span));

    let error_code = match result {
        Ok(()) => 0,
        Err(msg) => {
            tracing::error!("Error is {:?}", msg);
            2
        }
    };
    process::exit(error_code);
}

async fn run(options: ClientOptions) -> anyhow::Result<()> {
    let config = options.network_config()?;
    let wallet = options.make_wallet(&config)?;
    let command = options.command.unwrap_or(ClientCommand::Interactive);

    match command {
        ClientCommand::Accounts => {
            let wallet = wallet.with_context(|| Notice::WalletNotFound.to_string())?;
            for account in wallet.request_accounts().await? {
                println!("{account}");
            }
        }

        ClientCommand::Create {
            owner_name,
            description,
        } => {
            let form = CertificateForm::new(wallet);
            form.connect()
                .await?
                .with_context(|| Notice::WalletNotFound.to_string())?;
            form.set_owner_name(owner_name).await;
            form.set_description(description).await;
            let submission = form.submit().await?;
            println!("Certificate Hash: {}", submission.certificate_hash);
            println!(
                "Transaction: {}",
                config.explorer_link(&submission.transaction_hash)
            );
        }

        ClientCommand::Get { certificate_hash } => {
            let form = CertificateForm::new(wallet);
            form.set_lookup_query(certificate_hash).await;
            let record = form.lookup().await?;
            println!("Owner: {}", record.owner);
            println!("Owner Name: {}", record.owner_name);
            println!("Description: {}", record.description);
        }

        ClientCommand::Interactive => {
            let form = Arc::new(CertificateForm::new(wallet));
            let input = BufReader::new(tokio::io::stdin());
            interactive::run(form, &config, input).await?;
        }
    }
    Ok(())
}
