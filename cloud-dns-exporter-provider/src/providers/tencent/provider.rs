//! 腾讯云 DnsProvider 实现

use async_trait::async_trait;

use crate::credentials::AccessCredential;
use crate::error::{ProviderError, Result};
use crate::pagination::{collect_pages, page_offset};
use crate::providers::common::{collect_per_zone, full_record_name, merge_visibility_classes};
use crate::traits::{DnsProvider, ErrorContext};
use crate::types::{Account, Domain, DomainType, Record, RecordStatus};
use crate::utils::datetime::{self, TimeFormat};

use super::types::{
    DnspodDomain, DnspodRecord, DomainListParams, DomainListResponse, OffsetParams, PrivateZone,
    PrivateZoneListResponse, PrivateZoneRecord, PrivateZoneRecordListResponse, RecordListParams,
    RecordListResponse, ZoneRecordListParams,
};
use super::{RECORD_PAGE_SIZE, TencentProvider, ZONE_PAGE_SIZE};

/// `CreatedOn` / `UpdatedOn` are local `YYYY-MM-DD HH:MM:SS`; some PrivateDNS
/// responses use RFC 3339 instead.
const TIME_FORMATS: &[TimeFormat] = &[
    TimeFormat::Pattern("%Y-%m-%d %H:%M:%S"),
    TimeFormat::Rfc3339,
];

/// `DNSPod` reports an empty listing as an error instead of an empty page.
fn empty_when_no_records<T>(result: Result<Vec<T>>) -> Result<Vec<T>> {
    match result {
        Err(ProviderError::NoRecords { .. }) => Ok(Vec::new()),
        other => other,
    }
}

impl TencentProvider {
    async fn public_zones(&self, credential: &AccessCredential) -> Result<Vec<DnspodDomain>> {
        collect_pages(ZONE_PAGE_SIZE, |page| async move {
            let result = self
                .client
                .call::<DomainListResponse, _>(
                    credential,
                    &self.dnspod,
                    "DescribeDomainList",
                    &DomainListParams {
                        domain_type: "ALL",
                        offset: page_offset(page, ZONE_PAGE_SIZE),
                        limit: ZONE_PAGE_SIZE,
                    },
                    ErrorContext::default(),
                )
                .await
                .map(|r| r.domain_list);
            empty_when_no_records(result)
        })
        .await
    }

    async fn private_zones(&self, credential: &AccessCredential) -> Result<Vec<PrivateZone>> {
        collect_pages(ZONE_PAGE_SIZE, |page| async move {
            let response: PrivateZoneListResponse = self
                .client
                .call(
                    credential,
                    &self.privatedns,
                    "DescribePrivateZoneList",
                    &OffsetParams {
                        offset: page_offset(page, ZONE_PAGE_SIZE),
                        limit: ZONE_PAGE_SIZE,
                    },
                    ErrorContext::default(),
                )
                .await?;
            Ok(response.private_zone_set)
        })
        .await
    }

    async fn public_zone_records(
        &self,
        credential: &AccessCredential,
        domain_name: &str,
    ) -> Result<Vec<DnspodRecord>> {
        collect_pages(RECORD_PAGE_SIZE, |page| async move {
            let result = self
                .client
                .call::<RecordListResponse, _>(
                    credential,
                    &self.dnspod,
                    "DescribeRecordList",
                    &RecordListParams {
                        domain: domain_name,
                        offset: page_offset(page, RECORD_PAGE_SIZE),
                        limit: RECORD_PAGE_SIZE,
                    },
                    ErrorContext::domain(domain_name),
                )
                .await
                .map(|r| r.record_list);
            empty_when_no_records(result)
        })
        .await
    }

    async fn private_zone_records(
        &self,
        credential: &AccessCredential,
        zone_id: &str,
    ) -> Result<Vec<PrivateZoneRecord>> {
        collect_pages(ZONE_PAGE_SIZE, |page| async move {
            let response: PrivateZoneRecordListResponse = self
                .client
                .call(
                    credential,
                    &self.privatedns,
                    "DescribePrivateZoneRecordList",
                    &ZoneRecordListParams {
                        zone_id,
                        offset: page_offset(page, ZONE_PAGE_SIZE),
                        limit: ZONE_PAGE_SIZE,
                    },
                    ErrorContext::domain(zone_id),
                )
                .await?;
            Ok(response.record_set)
        })
        .await
    }

    async fn public_records(&self, credential: &AccessCredential) -> Result<Vec<Record>> {
        let zones = self.public_zones(credential).await?;
        let account = &self.account;
        Ok(collect_per_zone(
            "tencent",
            zones,
            |zone| zone.name.clone(),
            |zone| async move {
                let records = self.public_zone_records(credential, &zone.name).await?;
                Ok(records
                    .into_iter()
                    .map(|r| public_record(account, &zone.name, r))
                    .collect())
            },
        )
        .await)
    }

    async fn private_records(&self, credential: &AccessCredential) -> Result<Vec<Record>> {
        let zones = self.private_zones(credential).await?;
        let account = &self.account;
        Ok(collect_per_zone(
            "tencent",
            zones,
            |zone| format!("{} ({})", zone.domain, zone.zone_id),
            |zone| async move {
                let records = self.private_zone_records(credential, &zone.zone_id).await?;
                Ok(records
                    .into_iter()
                    .map(|r| private_record(account, &zone.domain, r))
                    .collect())
            },
        )
        .await)
    }
}

#[async_trait]
impl DnsProvider for TencentProvider {
    fn id(&self) -> &'static str {
        "tencent"
    }

    async fn list_domains(&self) -> Result<Vec<Domain>> {
        let credential = self.credentials.resolve().await?;
        let credential = &credential;
        let account = &self.account;

        let public = async move {
            self.public_zones(credential).await.map(|zones| {
                zones
                    .into_iter()
                    .map(|z| public_domain(account, z))
                    .collect::<Vec<_>>()
            })
        };
        let private = account.enable_private_dns.then_some(async move {
            self.private_zones(credential).await.map(|zones| {
                zones
                    .into_iter()
                    .map(|z| private_domain(account, z))
                    .collect::<Vec<_>>()
            })
        });

        merge_visibility_classes("tencent", &account.name, "domains", public, private).await
    }

    async fn list_records(&self) -> Result<Vec<Record>> {
        let credential = self.credentials.resolve().await?;
        let private = self
            .account
            .enable_private_dns
            .then_some(self.private_records(&credential));

        merge_visibility_classes(
            "tencent",
            &self.account.name,
            "records",
            self.public_records(&credential),
            private,
        )
        .await
    }
}

// ============ 结构转换 ============

fn normalize_time(raw: Option<&str>) -> String {
    raw.map(|t| datetime::normalize(t, TIME_FORMATS))
        .unwrap_or_default()
}

fn public_domain(account: &Account, domain: DnspodDomain) -> Domain {
    Domain {
        cloud_provider: account.provider.to_string(),
        cloud_name: account.name.clone(),
        domain_id: DomainType::Public.domain_id(&domain.name),
        domain_type: DomainType::Public,
        domain_remark: domain.remark.unwrap_or_default(),
        domain_status: domain.status.to_lowercase(),
        created_date: normalize_time(domain.created_on.as_deref()),
        expiry_date: String::new(),
        days_until_expiry: 0,
        domain_name: domain.name,
    }
}

fn private_domain(account: &Account, zone: PrivateZone) -> Domain {
    Domain {
        cloud_provider: account.provider.to_string(),
        cloud_name: account.name.clone(),
        domain_id: DomainType::Private.domain_id(&zone.zone_id),
        domain_name: zone.domain,
        domain_type: DomainType::Private,
        domain_remark: zone.remark.unwrap_or_default(),
        domain_status: zone.status.to_lowercase(),
        created_date: normalize_time(zone.created_on.as_deref()),
        expiry_date: String::new(),
        days_until_expiry: 0,
    }
}

fn public_record(account: &Account, domain_name: &str, record: DnspodRecord) -> Record {
    Record {
        cloud_provider: account.provider.to_string(),
        cloud_name: account.name.clone(),
        domain_name: domain_name.to_string(),
        domain_type: DomainType::Public,
        full_record: full_record_name(&record.name, domain_name),
        record_id: record.record_id.to_string(),
        record_type: record.record_type,
        record_name: record.name,
        record_value: record.value,
        record_ttl: record.ttl,
        record_weight: record.weight.unwrap_or_default(),
        record_status: RecordStatus::from_vendor(&record.status),
        record_remark: record.remark.unwrap_or_default(),
        update_time: normalize_time(record.updated_on.as_deref()),
    }
}

fn private_record(account: &Account, zone_name: &str, record: PrivateZoneRecord) -> Record {
    Record {
        cloud_provider: account.provider.to_string(),
        cloud_name: account.name.clone(),
        domain_name: zone_name.to_string(),
        domain_type: DomainType::Private,
        full_record: full_record_name(&record.sub_domain, zone_name),
        record_id: record.record_id,
        record_type: record.record_type,
        record_name: record.sub_domain,
        record_value: record.record_value,
        record_ttl: record.ttl,
        record_weight: record.weight.unwrap_or_default(),
        record_status: RecordStatus::from_vendor(&record.status),
        record_remark: record.remark.unwrap_or_default(),
        update_time: normalize_time(record.updated_on.as_deref()),
    }
}
