use std::sync::Arc;

use serde::Serialize;

use crate::{
    db::db::DBClient,
    models::walletmodel::{TransactionStatus, TransactionType, WalletTransaction},
    service::error::ServiceError,
};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RevenueSummary {
    pub completed_deposits: i64,
    pub completed_withdrawals: i64,
    /// Deposits minus withdrawals, completed transactions only.
    pub real_revenue: i64,
    pub deposit_count: i64,
    pub withdrawal_count: i64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderStatusCount {
    pub status: crate::models::ordermodel::OrderStatus,
    pub count: i64,
}

#[derive(Debug, Clone)]
pub struct AnalyticsService {
    db_client: Arc<DBClient>,
}

impl AnalyticsService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    pub async fn revenue_summary(&self) -> Result<RevenueSummary, ServiceError> {
        let transactions = sqlx::query_as::<_, WalletTransaction>(
            r#"
            SELECT * FROM wallet_transactions
            WHERE status = 'completed'
            "#,
        )
        .fetch_all(&self.db_client.pool)
        .await?;

        Ok(compute_revenue_summary(&transactions))
    }

    pub async fn order_status_counts(&self) -> Result<Vec<OrderStatusCount>, ServiceError> {
        let counts = sqlx::query_as::<_, OrderStatusCount>(
            r#"
            SELECT status, COUNT(*) AS count
            FROM orders
            GROUP BY status
            ORDER BY count DESC
            "#,
        )
        .fetch_all(&self.db_client.pool)
        .await?;

        Ok(counts)
    }

    pub async fn export_revenue_csv(&self) -> Result<String, ServiceError> {
        let summary = self.revenue_summary().await?;
        Ok(revenue_csv(&summary))
    }
}

/// Pure aggregation over already-filtered completed transactions; pending
/// and failed rows contribute nothing even if passed in.
pub fn compute_revenue_summary(transactions: &[WalletTransaction]) -> RevenueSummary {
    let mut summary = RevenueSummary {
        completed_deposits: 0,
        completed_withdrawals: 0,
        real_revenue: 0,
        deposit_count: 0,
        withdrawal_count: 0,
    };

    for tx in transactions {
        if tx.status != TransactionStatus::Completed {
            continue;
        }
        match tx.tx_type {
            TransactionType::Deposit => {
                summary.completed_deposits += tx.amount;
                summary.deposit_count += 1;
            }
            TransactionType::Withdrawal => {
                summary.completed_withdrawals += tx.amount;
                summary.withdrawal_count += 1;
            }
        }
    }

    summary.real_revenue = summary.completed_deposits - summary.completed_withdrawals;
    summary
}

pub fn revenue_csv(summary: &RevenueSummary) -> String {
    let mut out = String::new();
    out.push_str("metric,value\n");
    out.push_str(&format!("{},{}\n", csv_field("completed_deposits"), summary.completed_deposits));
    out.push_str(&format!("{},{}\n", csv_field("completed_withdrawals"), summary.completed_withdrawals));
    out.push_str(&format!("{},{}\n", csv_field("real_revenue"), summary.real_revenue));
    out.push_str(&format!("{},{}\n", csv_field("deposit_count"), summary.deposit_count));
    out.push_str(&format!("{},{}\n", csv_field("withdrawal_count"), summary.withdrawal_count));
    out
}

// Minimal quoting: wrap and double-escape fields containing separators.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn tx(tx_type: TransactionType, status: TransactionStatus, amount: i64) -> WalletTransaction {
        WalletTransaction {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            tx_type,
            status,
            amount,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn real_revenue_is_deposits_minus_withdrawals() {
        use TransactionStatus::*;
        use TransactionType::*;

        let transactions = vec![
            tx(Deposit, Completed, 100),
            tx(Deposit, Completed, 200),
            tx(Deposit, Completed, 300),
            tx(Withdrawal, Completed, 50),
        ];

        let summary = compute_revenue_summary(&transactions);
        assert_eq!(summary.completed_deposits, 600);
        assert_eq!(summary.completed_withdrawals, 50);
        assert_eq!(summary.real_revenue, 550);
        assert_eq!(summary.deposit_count, 3);
        assert_eq!(summary.withdrawal_count, 1);
    }

    #[test]
    fn non_completed_transactions_ignored() {
        use TransactionStatus::*;
        use TransactionType::*;

        let transactions = vec![
            tx(Deposit, Completed, 100),
            tx(Deposit, Pending, 999),
            tx(Withdrawal, Failed, 999),
        ];

        let summary = compute_revenue_summary(&transactions);
        assert_eq!(summary.real_revenue, 100);
    }

    #[test]
    fn csv_round_trips_the_numbers() {
        let summary = RevenueSummary {
            completed_deposits: 600,
            completed_withdrawals: 50,
            real_revenue: 550,
            deposit_count: 3,
            withdrawal_count: 1,
        };

        let csv = revenue_csv(&summary);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "metric,value");

        let parsed: i64 = lines
            .iter()
            .find(|l| l.starts_with("real_revenue,"))
            .and_then(|l| l.split(',').nth(1))
            .and_then(|v| v.parse().ok())
            .unwrap();
        assert_eq!(parsed, 550);
    }

    #[test]
    fn csv_escapes_separators() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
