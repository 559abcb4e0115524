//! Small 2025-shaped tables shared by the calculation tests.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::{
    AdditionalMedicareThresholds, BracketTable, FilingStatus, JurisdictionTaxData,
    PayrollTaxConstants, SdiRule, SdiTable, TaxBracket, TaxTables,
};

fn table(brackets: &[(Decimal, Option<Decimal>)]) -> BracketTable {
    BracketTable::new(
        brackets
            .iter()
            .map(|&(rate, max_income)| TaxBracket { rate, max_income })
            .collect(),
    )
    .expect("test table is valid")
}

pub(crate) fn tables() -> TaxTables {
    let mut jurisdictions = JurisdictionTaxData::new();
    jurisdictions.insert_federal(
        FilingStatus::Single,
        table(&[
            (dec!(0.10), Some(dec!(11925))),
            (dec!(0.12), Some(dec!(48475))),
            (dec!(0.22), Some(dec!(103350))),
            (dec!(0.24), Some(dec!(197300))),
            (dec!(0.32), Some(dec!(250525))),
            (dec!(0.35), Some(dec!(626350))),
            (dec!(0.37), None),
        ]),
    );
    jurisdictions.insert_state("TX", BracketTable::empty());
    jurisdictions.insert_state("PA", BracketTable::flat(dec!(0.0307)));
    jurisdictions.insert_state(
        "CA",
        table(&[
            (dec!(0.01), Some(dec!(10412))),
            (dec!(0.02), Some(dec!(24684))),
            (dec!(0.04), Some(dec!(38959))),
            (dec!(0.06), Some(dec!(54081))),
            (dec!(0.08), Some(dec!(68350))),
            (dec!(0.093), Some(dec!(349137))),
            (dec!(0.103), Some(dec!(418966))),
            (dec!(0.113), Some(dec!(698274))),
            (dec!(0.123), None),
            (dec!(0.133), None),
        ]),
    );
    jurisdictions.insert_state(
        "NY",
        table(&[
            (dec!(0.04), Some(dec!(8500))),
            (dec!(0.045), Some(dec!(11700))),
            (dec!(0.0525), Some(dec!(13900))),
            (dec!(0.055), Some(dec!(80650))),
            (dec!(0.06), Some(dec!(215400))),
            (dec!(0.0685), Some(dec!(1077550))),
            (dec!(0.0965), Some(dec!(5000000))),
            (dec!(0.103), Some(dec!(25000000))),
            (dec!(0.109), None),
        ]),
    );
    jurisdictions.insert_state(
        "NJ",
        table(&[
            (dec!(0.014), Some(dec!(20000))),
            (dec!(0.0175), Some(dec!(35000))),
            (dec!(0.035), Some(dec!(40000))),
            (dec!(0.05525), Some(dec!(75000))),
            (dec!(0.0637), Some(dec!(500000))),
            (dec!(0.0897), Some(dec!(1000000))),
            (dec!(0.1075), None),
        ]),
    );
    jurisdictions.insert_city(
        "NY",
        "NYC",
        table(&[
            (dec!(0.03078), Some(dec!(12000))),
            (dec!(0.03762), Some(dec!(25000))),
            (dec!(0.03819), Some(dec!(50000))),
            (dec!(0.03876), None),
        ]),
    );

    let mut sdi = SdiTable::new();
    sdi.insert(
        "CA",
        SdiRule::WageCapped {
            rate: dec!(0.011),
            wage_cap: Some(dec!(160174)),
            contribution_cap: Some(dec!(1761.91)),
        },
    );
    sdi.insert(
        "NY",
        SdiRule::FlatWeekly {
            rate: dec!(0.005),
            weekly_cap_amount: dec!(0.60),
        },
    );

    TaxTables {
        jurisdictions,
        payroll: PayrollTaxConstants {
            social_security_rate: dec!(0.062),
            social_security_wage_base: dec!(177300),
            medicare_rate: dec!(0.0145),
            additional_medicare_rate: dec!(0.009),
            additional_medicare_thresholds: AdditionalMedicareThresholds {
                single: dec!(200000),
                married_filing_jointly: dec!(250000),
                married_filing_separately: dec!(125000),
                head_of_household: dec!(200000),
            },
        },
        sdi,
    }
}
