use clap::Parser;
use school_portal::config::cli::Command;
use school_portal::config::LogFormat;
use school_portal::core::{ConfigProvider, Storage};
use school_portal::domain::model::{RecordId, Session};
use school_portal::forms::{ContactForm, LoginForm};
use school_portal::utils::error::ErrorSeverity;
use school_portal::utils::validation::{apply_phone_mask, validate_email, validate_pk_phone, Validate};
use school_portal::utils::{format, logger};
use school_portal::{
    filter_records, ApiClient, CliConfig, LocalStorage, PortalConfig, PortalError, Result,
    SlipGenerator,
};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    match config.logging.format {
        LogFormat::Compact => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(cli.verbose),
    }
    tracing::debug!("Using backend at {}", config.api.base_url);

    if let Err(e) = run(cli.command, &config).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        if let PortalError::ValidationError(errors) = &e {
            for (field, message) in errors.iter() {
                eprintln!("  • {}: {}", field, message);
            }
        }
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 2,
            ErrorSeverity::Medium => 3,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 4,
        };
        std::process::exit(exit_code);
    }
}

fn load_config(cli: &CliConfig) -> Result<PortalConfig> {
    let mut config = match (&cli.config, &cli.base_url) {
        (Some(path), _) => PortalConfig::from_file(path)?,
        (None, Some(base_url)) => PortalConfig::with_base_url(base_url),
        (None, None) => {
            return Err(PortalError::MissingConfigError {
                field: "--config or --base-url".to_string(),
            })
        }
    };

    if let Some(base_url) = &cli.base_url {
        config.api.base_url = base_url.clone();
    }
    if let Some(output) = &cli.output {
        config.output.directory = output.clone();
    }

    config.validate()?;
    Ok(config)
}

async fn connect(config: &PortalConfig, session_store: &LocalStorage) -> Result<ApiClient> {
    let api = ApiClient::from_config(config)?;

    if let Some(token) = config.token() {
        return Ok(api.with_token(token));
    }

    match session_store.read_file(config.session_file()).await {
        Ok(bytes) => {
            let session: Session = serde_json::from_slice(&bytes)?;
            Ok(api.with_token(session.token))
        }
        Err(_) => {
            tracing::debug!("No stored session, continuing anonymously");
            Ok(api)
        }
    }
}

async fn run(command: Command, config: &PortalConfig) -> Result<()> {
    let session_store = LocalStorage::new(".");

    match command {
        Command::CheckPhone { phone } => {
            let masked = apply_phone_mask(&phone);
            if validate_pk_phone(&phone) {
                println!("✅ {} is a valid mobile number", masked);
            } else {
                println!("❌ {} is not a valid 03XX-XXXXXXX mobile number", phone);
            }
            Ok(())
        }
        Command::CheckEmail { email } => {
            if validate_email(&email) {
                println!("✅ {} is a valid email address", email);
            } else {
                println!("❌ {} is not a valid email address", email);
            }
            Ok(())
        }
        Command::Login { email, password } => {
            let mut api = ApiClient::from_config(config)?;
            let session = api.login(&LoginForm { email, password }).await?;
            let bytes = serde_json::to_vec_pretty(&session)?;
            session_store
                .write_file(config.session_file(), &bytes)
                .await?;
            let who = session
                .user
                .as_ref()
                .map(|u| u.name.as_str())
                .unwrap_or("user");
            println!("✅ Logged in as {}", who);
            Ok(())
        }
        Command::Logout => {
            let mut api = connect(config, &session_store).await?;
            let result = api.logout().await;
            let path = session_store.path_of(config.session_file());
            if path.exists() {
                tokio::fs::remove_file(path).await?;
            }
            result?;
            println!("✅ Logged out");
            Ok(())
        }
        Command::Guardians { search, id } => {
            let api = connect(config, &session_store).await?;
            if let Some(id) = id {
                let guardian = api.guardian_with_students(&RecordId::from(id.as_str())).await?;
                println!("{}", serde_json::to_string_pretty(&guardian)?);
                return Ok(());
            }
            let guardians = api.list_guardians().await?;
            let hits = filter_records(&guardians, search.as_deref().unwrap_or_default());
            for g in &hits {
                println!(
                    "{:<28} {:<16} {}",
                    g.name,
                    g.mobile.as_deref().unwrap_or("-"),
                    g.email.as_deref().unwrap_or("-")
                );
            }
            println!("{} of {} guardians", hits.len(), guardians.len());
            Ok(())
        }
        Command::Teachers { search } => {
            let api = connect(config, &session_store).await?;
            let teachers = api.list_teachers().await?;
            let hits = filter_records(&teachers, search.as_deref().unwrap_or_default());
            for t in &hits {
                println!(
                    "{:<28} {:<20} {}",
                    t.name,
                    t.subject.as_deref().unwrap_or("-"),
                    t.email
                );
            }
            println!("{} of {} teachers", hits.len(), teachers.len());
            Ok(())
        }
        Command::Registrations { search } => {
            let api = connect(config, &session_store).await?;
            let registrations = api.list_registrations().await?;
            let hits = filter_records(&registrations, search.as_deref().unwrap_or_default());
            for r in &hits {
                println!(
                    "{:<14} {:<28} {:<12} {}",
                    r.roll_number.as_deref().unwrap_or("-"),
                    r.name,
                    r.grade_label().unwrap_or_else(|| "-".to_string()),
                    r.test_date.as_deref().map(format::format_date).unwrap_or_default()
                );
            }
            println!("{} of {} registrations", hits.len(), registrations.len());
            Ok(())
        }
        Command::Slip { roll_number, id } => {
            let api = connect(config, &session_store).await?;
            let registration = match (roll_number, id) {
                (Some(roll_number), _) => api.find_by_roll_number(&roll_number).await?,
                (None, Some(id)) => api.get_registration(&RecordId::from(id.as_str())).await?,
                (None, None) => {
                    return Err(PortalError::MissingConfigError {
                        field: "--roll-number or --id".to_string(),
                    })
                }
            };

            let storage = LocalStorage::new(config.output_path());
            let generator = SlipGenerator::new(api, storage.clone(), config.school.clone());
            let file_name = generator.generate(&registration).await?;
            println!("📁 Slip saved to: {}", storage.path_of(&file_name).display());
            Ok(())
        }
        Command::UploadPhoto { id, file } => {
            let api = connect(config, &session_store).await?;
            let registration = api
                .upload_profile_picture(&RecordId::from(id.as_str()), &file)
                .await?;
            println!(
                "✅ Profile picture updated: {}",
                registration.profile_picture_url.as_deref().unwrap_or("-")
            );
            Ok(())
        }
        Command::UploadPayment { id, file } => {
            let api = connect(config, &session_store).await?;
            let admission = api
                .upload_payment_attachment(&RecordId::from(id.as_str()), &file)
                .await?;
            println!(
                "✅ Payment attachment uploaded: {}",
                admission.payment_attachment_url.as_deref().unwrap_or("-")
            );
            Ok(())
        }
        Command::Contact {
            name,
            email,
            phone,
            subject,
            message,
        } => {
            let api = ApiClient::from_config(config)?;
            let form = ContactForm {
                name,
                email,
                phone,
                subject,
                message,
            };
            api.submit_contact(&form).await?;
            println!("✅ Thank you, your message has been sent");
            Ok(())
        }
    }
}
