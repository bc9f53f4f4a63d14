//! Turns a PM2.5 average into an air quality category.

use anyhow::{Context, Result};

use crate::{
    classify::AqiCategory,
    mailbox::{Mailbox, PM25_AVG, RESPONSE},
};

use super::PostOffice;

pub async fn summary(office: &PostOffice) -> Result<AqiCategory> {
    let request: Mailbox<f64> = office.mailbox(PM25_AVG);
    let average = office.wait(&request).await?;

    let category = AqiCategory::from_pm25(average)
        .with_context(|| format!("Cannot classify PM2.5 average {}", average))?;
    tracing::info!("PM2.5 average {} is {}", average, category);

    let response: Mailbox<String> = office.mailbox(RESPONSE);
    response.send(&format!("{}\n", category.label())).await?;

    Ok(category)
}

// -- Tests -------------------------------------------------------------------
