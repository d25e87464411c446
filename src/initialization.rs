use log::info;
use crate::config::{Config, MailParameters, Transport};
use crate::errors::BriefError;
use crate::manager_mail::{Mail, MailTransport, SendGrid, Smtp};
use crate::manager_open_meteo::OpenMeteo;

/// Managers used by a run
pub struct Mgr {
    pub open_meteo: OpenMeteo,
    pub mail: Mail,
}

/// Instantiates the forecast and mail managers from a loaded configuration.
/// Nothing here touches the network.
///
/// # Arguments
///
/// * 'config' - the loaded and checked configuration
pub fn init(config: &Config) -> Result<Mgr, BriefError> {
    info!("wx_brief version: {}", env!("CARGO_PKG_VERSION"));

    let open_meteo = OpenMeteo::new(config.geo_ref.lat, config.geo_ref.long, &config.geo_ref.timezone);

    let transport = mail_transport(&config.mail)?;
    let from = config.mail.from.as_deref().ok_or(BriefError::ConfigurationMissing("EMAIL_FROM"))?;
    let mail = Mail::new(transport, from, &config.mail.to)
        .map_err(|e| BriefError::Configuration(e.to_string()))?;

    info!("brief format {} via {:?} to {} recipient(s)", config.report.format, config.mail.transport, mail.recipients().len());

    Ok(Mgr { open_meteo, mail })
}

fn mail_transport(mail: &MailParameters) -> Result<Box<dyn MailTransport>, BriefError> {
    match mail.transport {
        Transport::SendGrid => {
            let api_key = mail.api_key.clone().ok_or(BriefError::ConfigurationMissing("SENDGRID_API_KEY"))?;
            Ok(Box::new(SendGrid::new(api_key)))
        }
        Transport::Smtp => {
            let endpoint = mail.smtp_endpoint.as_deref().ok_or(BriefError::ConfigurationMissing("mail.smtp_endpoint"))?;
            let user = mail.smtp_user.clone().ok_or(BriefError::ConfigurationMissing("mail.smtp_user"))?;
            let password = mail.smtp_password.clone().ok_or(BriefError::ConfigurationMissing("SMTP_PASSWORD"))?;
            let smtp = Smtp::new(endpoint, user, password)
                .map_err(|e| BriefError::Configuration(e.to_string()))?;
            Ok(Box::new(smtp))
        }
    }
}
