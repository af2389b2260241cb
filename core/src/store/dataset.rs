use super::SimStore;
use crate::{
    ab_test_subsystem::AbTestRecord,
    dataset::{Dataset, ProfileRow, RecommendationRow},
    error::SimResult,
    interaction_subsystem::InteractionEvent,
};
use rusqlite::{params, Connection};

impl SimStore {
    // ── Dataset ───────────────────────────────────────────────────

    /// Write all four tables for a run in a single transaction.
    pub fn save_dataset(&self, run_id: &str, dataset: &Dataset) -> SimResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        for row in dataset.profile_rows() {
            insert_profile(&tx, run_id, &row)?;
        }
        for event in &dataset.interactions {
            insert_interaction(&tx, run_id, event)?;
        }
        for rec in &dataset.recommendations {
            insert_recommendation(&tx, run_id, rec)?;
        }
        for record in &dataset.ab_tests {
            insert_ab_test(&tx, run_id, record)?;
        }
        tx.commit()?;
        log::info!(
            "store: saved run {run_id} ({} profiles, {} interactions, {} recommendations, {} ab records)",
            dataset.profiles.len(),
            dataset.interactions.len(),
            dataset.recommendations.len(),
            dataset.ab_tests.len()
        );
        Ok(())
    }

    /// Conversion totals per variant: (variant, records, conversions).
    pub fn conversions_by_variant(&self, run_id: &str) -> SimResult<Vec<(String, i64, i64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT variant, COUNT(*), SUM(converted)
             FROM ab_test_result WHERE run_id = ?1
             GROUP BY variant ORDER BY variant",
        )?;
        let rows: Vec<(String, i64, i64)> = stmt
            .query_map(params![run_id], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Customer count per segment label.
    pub fn segment_counts(&self, run_id: &str) -> SimResult<Vec<(String, i64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT segment, COUNT(*) FROM customer_profile
             WHERE run_id = ?1 GROUP BY segment ORDER BY segment",
        )?;
        let rows: Vec<(String, i64)> = stmt
            .query_map(params![run_id], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

fn insert_profile(conn: &Connection, run_id: &str, p: &ProfileRow) -> SimResult<()> {
    conn.execute(
        "INSERT INTO customer_profile (
            run_id, customer_id, age, income, segment, behavior_score, last_interaction,
            pref_financial_services, pref_digital_banking, pref_investment_products,
            pref_risk_tolerance, pref_tech_savviness, pref_price_sensitivity, pref_brand_loyalty
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        params![
            run_id,
            &p.customer_id,
            p.age,
            p.income,
            p.segment.as_str(),
            p.behavior_score,
            p.last_interaction.to_rfc3339(),
            p.pref_financial_services,
            p.pref_digital_banking,
            p.pref_investment_products,
            p.pref_risk_tolerance,
            p.pref_tech_savviness,
            p.pref_price_sensitivity,
            p.pref_brand_loyalty,
        ],
    )?;
    Ok(())
}

fn insert_interaction(conn: &Connection, run_id: &str, e: &InteractionEvent) -> SimResult<()> {
    conn.execute(
        "INSERT INTO interaction_event (
            run_id, event_id, customer_id, timestamp, interaction_type, content_category,
            engagement_duration, engagement_score, device_type, channel
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            run_id,
            &e.event_id,
            &e.customer_id,
            e.timestamp.to_rfc3339(),
            e.interaction_type.as_str(),
            e.content_category.as_str(),
            e.engagement_duration,
            e.engagement_score,
            e.device_type.as_str(),
            e.channel.as_str(),
        ],
    )?;
    Ok(())
}

fn insert_recommendation(conn: &Connection, run_id: &str, r: &RecommendationRow) -> SimResult<()> {
    conn.execute(
        "INSERT INTO recommendation (
            run_id, customer_id, recommendation_type, content, confidence_score,
            expected_engagement, timestamp, customer_segment, customer_behavior_score
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            run_id,
            &r.customer_id,
            r.recommendation_type.as_str(),
            &r.content,
            r.confidence_score,
            r.expected_engagement,
            r.timestamp.to_rfc3339(),
            r.customer_segment.as_str(),
            r.customer_behavior_score,
        ],
    )?;
    Ok(())
}

fn insert_ab_test(conn: &Connection, run_id: &str, a: &AbTestRecord) -> SimResult<()> {
    conn.execute(
        "INSERT INTO ab_test_result (
            run_id, test_id, customer_id, variant, recommendation_type,
            expected_engagement, actual_engagement, converted, timestamp
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            run_id,
            &a.test_id,
            &a.customer_id,
            a.variant.as_str(),
            a.recommendation_type.as_str(),
            a.expected_engagement,
            a.actual_engagement,
            if a.converted { 1i64 } else { 0i64 },
            a.timestamp.to_rfc3339(),
        ],
    )?;
    Ok(())
}
